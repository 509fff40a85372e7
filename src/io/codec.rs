//! Codec abstraction for ledger interchange files
//!
//! Each supported [`LedgerFormat`] has one [`LedgerCodec`] implementation
//! that translates between bytes and a [`LedgerDocument`]. Export and import
//! are provided on top of that pair, so a codec only has to know its own
//! syntax. The format is chosen at runtime through [`create_codec`].

use crate::core::store::LedgerStore;
use crate::io::csv_format::CsvCodec;
use crate::io::document::LedgerDocument;
use crate::io::json_format::JsonCodec;
use crate::io::yaml_format::YamlCodec;
use crate::types::{ImportReport, LedgerError, LedgerFormat, Result};
use log::info;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Serialises a whole ledger to and from one interchange format
///
/// Implementations must write sections in the order accounts, categories,
/// operations, and must accept an empty section.
pub trait LedgerCodec: Send + Sync {
    /// Format this codec reads and writes
    fn format(&self) -> LedgerFormat;

    /// Write `document` to `output`
    ///
    /// # Errors
    ///
    /// Returns `Io` if the writer fails.
    fn encode(&self, document: &LedgerDocument, output: &mut dyn Write) -> Result<()>;

    /// Read a complete document from `input`
    ///
    /// # Errors
    ///
    /// Returns `Parse` with the offending line where the format reports one,
    /// or `Io` if the reader fails.
    fn decode(&self, input: &mut dyn Read) -> Result<LedgerDocument>;

    /// Encode a snapshot of `store`
    fn export(&self, store: &LedgerStore, output: &mut dyn Write) -> Result<()> {
        self.encode(&LedgerDocument::from_store(store), output)
    }

    /// Decode `input` completely, then apply it to `store`
    ///
    /// A decode failure leaves the store untouched.
    fn import(&self, input: &mut dyn Read, store: &mut LedgerStore) -> Result<ImportReport> {
        let document = self.decode(input)?;
        Ok(document.restore_into(store))
    }
}

/// Create the codec for a format
///
/// # Arguments
///
/// * `format` - Interchange format to read or write
///
/// # Returns
///
/// A boxed trait object implementing [`LedgerCodec`]
pub fn create_codec(format: LedgerFormat) -> Box<dyn LedgerCodec> {
    match format {
        LedgerFormat::Csv => Box::new(CsvCodec),
        LedgerFormat::Json => Box::new(JsonCodec),
        LedgerFormat::Yaml => Box::new(YamlCodec),
    }
}

/// Export `store` to `path`, replacing any existing file
///
/// The document is encoded in memory and written to a sibling temp file,
/// which is then renamed over `path`. A failed export leaves `path` as it was.
///
/// # Errors
///
/// Returns `Io` if the temp file cannot be written or renamed.
pub fn export_to_file(codec: &dyn LedgerCodec, store: &LedgerStore, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    codec.export(store, &mut buffer)?;

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, &buffer)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    info!(
        "Exported {} accounts, {} categories, {} operations to {} as {}",
        store.accounts().len(),
        store.categories().len(),
        store.operations().len(),
        path.display(),
        codec.format()
    );
    Ok(())
}

/// Import the ledger file at `path` into `store`
///
/// # Errors
///
/// - `FileNotFound` if `path` is not an existing file
/// - `Io` / `Parse` if the file cannot be read or decoded; the store is
///   left unchanged
pub fn import_from_file(
    codec: &dyn LedgerCodec,
    path: &Path,
    store: &mut LedgerStore,
) -> Result<ImportReport> {
    if !path.is_file() {
        return Err(LedgerError::file_not_found(path));
    }

    let mut reader = BufReader::new(File::open(path)?);
    let report = codec.import(&mut reader, store)?;

    info!(
        "Imported {} accounts, {} categories, {} operations from {} ({} skipped)",
        report.accounts,
        report.categories,
        report.operations,
        path.display(),
        report.skipped
    );
    Ok(report)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
