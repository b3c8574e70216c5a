use std::path::{Path, PathBuf};

use super::{FileRepository, MemoryHistory};
use crate::{
    error::MolcapError,
    model::{FileId, FileRecord},
};

/// History persisted as a JSON array, rewritten after every change.
#[derive(Debug)]
pub struct JsonHistoryStore {
    path: PathBuf,
    records: MemoryHistory,
}

impl JsonHistoryStore {
    /// Open the store at `path`. A missing file is an empty history.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MolcapError> {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(text) => {
                let records: Vec<FileRecord> = serde_json::from_str(&text)?;
                log::info!(
                    "loaded {} history entries from {}",
                    records.len(),
                    path.display()
                );
                MemoryHistory::from_records(records)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no history at {}", path.display());
                MemoryHistory::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, records })
    }

    /// File backing the store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), MolcapError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self.records.list())?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl FileRepository for JsonHistoryStore {
    fn list(&self) -> &[FileRecord] {
        self.records.list()
    }

    fn add(&mut self, record: FileRecord) -> Result<(), MolcapError> {
        self.records.add(record)?;
        self.persist()
    }

    fn rename(&mut self, id: &FileId, name: &str) -> Result<bool, MolcapError> {
        let changed = self.records.rename(id, name)?;
        if changed {
            self.persist()?;
        }
        Ok(changed)
    }

    fn remove(
        &mut self,
        id: &FileId,
    ) -> Result<Option<FileRecord>, MolcapError> {
        let removed = self.records.remove(id)?;
        if removed.is_some() {
            self.persist()?;
        }
        Ok(removed)
    }

    fn clear(&mut self) -> Result<(), MolcapError> {
        self.records.clear()?;
        self.persist()
    }
}
