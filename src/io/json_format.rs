//! JSON ledger format
//!
//! One root object with `accounts`, `categories` and `operations` arrays.
//! Numbers and booleans are native JSON values; an absent description is
//! left out of its operation object. Output is pretty-printed.

use crate::io::codec::LedgerCodec;
use crate::io::document::LedgerDocument;
use crate::types::{LedgerFormat, Result};
use std::io::{Read, Write};

/// Codec for the JSON format
#[derive(Debug, Clone, Copy)]
pub struct JsonCodec;

impl LedgerCodec for JsonCodec {
    fn format(&self) -> LedgerFormat {
        LedgerFormat::Json
    }

    fn encode(&self, document: &LedgerDocument, output: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *output, document)?;
        writeln!(output)?;
        output.flush()?;
        Ok(())
    }

    fn decode(&self, input: &mut dyn Read) -> Result<LedgerDocument> {
        Ok(serde_json::from_reader(input)?)
    }
}
