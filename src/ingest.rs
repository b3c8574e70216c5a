//! Turning uploaded files into history records.

use std::path::Path;

use crate::{
    error::MolcapError,
    model::{FileRecord, ModelFormat},
};

/// Read the structure file at `path`.
///
/// Only `.pdb` and `.xyz` files are accepted; the check happens before the
/// file is read.
pub fn ingest_file(path: &Path) -> Result<FileRecord, MolcapError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| MolcapError::InvalidInput(path.display().to_string()))?;
    let format = ModelFormat::from_file_name(name)
        .ok_or_else(|| MolcapError::FileFormatRejected(name.to_owned()))?;
    let bytes = std::fs::read(path)?;
    Ok(record_from_bytes(name, &bytes, format))
}

/// Build a record from an upload already held in memory.
pub fn ingest_bytes(name: &str, bytes: &[u8]) -> Result<FileRecord, MolcapError> {
    let format = ModelFormat::from_file_name(name)
        .ok_or_else(|| MolcapError::FileFormatRejected(name.to_owned()))?;
    Ok(record_from_bytes(name, bytes, format))
}

fn record_from_bytes(name: &str, bytes: &[u8], format: ModelFormat) -> FileRecord {
    let content = String::from_utf8_lossy(bytes).into_owned();
    log::info!("ingested {name} ({} bytes, {})", bytes.len(), format.as_str());
    FileRecord::new(name, content, bytes.len() as u64, format)
}
