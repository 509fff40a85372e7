//! I/O module
//!
//! Reads and writes whole-ledger interchange files.
//!
//! # Components
//!
//! - `codec` - `LedgerCodec` trait, codec factory and file helpers
//! - `document` - Format-neutral snapshot of a ledger and its restore rules
//! - `csv_format` - Sectioned CSV format
//! - `json_format` - JSON format
//! - `yaml_format` - YAML format

pub mod codec;
pub mod csv_format;
pub mod document;
pub mod json_format;
pub mod yaml_format;

pub use codec::{create_codec, export_to_file, import_from_file, LedgerCodec};
pub use csv_format::CsvCodec;
pub use document::{AccountRecord, CategoryRecord, LedgerDocument, OperationRecord};
pub use json_format::JsonCodec;
pub use yaml_format::YamlCodec;
