//! YAML ledger format
//!
//! Same logical shape as the JSON format, rendered in block style.

use crate::io::codec::LedgerCodec;
use crate::io::document::LedgerDocument;
use crate::types::{LedgerFormat, Result};
use std::io::{Read, Write};

/// Codec for the YAML format
#[derive(Debug, Clone, Copy)]
pub struct YamlCodec;

impl LedgerCodec for YamlCodec {
    fn format(&self) -> LedgerFormat {
        LedgerFormat::Yaml
    }

    fn encode(&self, document: &LedgerDocument, output: &mut dyn Write) -> Result<()> {
        serde_yaml::to_writer(&mut *output, document)?;
        output.flush()?;
        Ok(())
    }

    fn decode(&self, input: &mut dyn Read) -> Result<LedgerDocument> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        if text.trim().is_empty() {
            return Ok(LedgerDocument::default());
        }
        Ok(serde_yaml::from_str(&text)?)
    }
}
