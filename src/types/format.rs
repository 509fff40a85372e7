//! Interchange file formats

use super::error::LedgerError;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// File formats the ledger can be exported to and imported from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerFormat {
    /// Sectioned, comma-delimited text
    #[default]
    Csv,
    /// Structured text with native typing
    Json,
    /// Indentation-based block text with native typing
    Yaml,
}

impl LedgerFormat {
    /// Infer the format from a file extension
    ///
    /// Recognizes `.csv`, `.json`, `.yaml` and `.yml` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `UnknownFormat` if the path has no extension or an
    /// unrecognized one.
    pub fn from_path(path: &Path) -> Result<Self, LedgerError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(LedgerFormat::Csv),
            Some("json") => Ok(LedgerFormat::Json),
            Some("yaml") | Some("yml") => Ok(LedgerFormat::Yaml),
            _ => Err(LedgerError::unknown_format(path)),
        }
    }

    /// Conventional file extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            LedgerFormat::Csv => "csv",
            LedgerFormat::Json => "json",
            LedgerFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for LedgerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
