//! Upload history: the ordered list of files the user has loaded.

/// JSON-file backed store.
pub mod json;
/// In-memory store.
pub mod memory;

pub use self::json::JsonHistoryStore;
pub use self::memory::MemoryHistory;
use crate::{
    error::MolcapError,
    model::{FileId, FileRecord},
};

/// Ordered collection of uploaded files, oldest first.
///
/// Mutations that change nothing (unknown id, rejected name) return
/// `Ok(false)` / `Ok(None)` rather than an error. Errors are reserved for
/// persistence failures.
pub trait FileRepository {
    /// Every record, oldest first.
    fn list(&self) -> &[FileRecord];

    /// Record with `id`.
    fn get(&self, id: &FileId) -> Option<&FileRecord> {
        self.list().iter().find(|r| &r.id == id)
    }

    /// Append `record`.
    fn add(&mut self, record: FileRecord) -> Result<(), MolcapError>;

    /// Rename a record. Blank names and unchanged names are ignored.
    /// Returns whether the record changed.
    fn rename(&mut self, id: &FileId, name: &str) -> Result<bool, MolcapError>;

    /// Delete a record, returning it.
    fn remove(&mut self, id: &FileId)
        -> Result<Option<FileRecord>, MolcapError>;

    /// Delete every record.
    fn clear(&mut self) -> Result<(), MolcapError>;
}

/// The name a rename should store, or `None` if the rename is a no-op.
fn accepted_name(current: &str, requested: &str) -> Option<String> {
    let trimmed = requested.trim();
    (!trimmed.is_empty() && trimmed != current).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_rules() {
        assert_eq!(accepted_name("a.pdb", "b.pdb"), Some("b.pdb".into()));
        assert_eq!(accepted_name("a.pdb", "  b.pdb "), Some("b.pdb".into()));
        assert_eq!(accepted_name("a.pdb", "a.pdb"), None);
        assert_eq!(accepted_name("a.pdb", " a.pdb"), None);
        assert_eq!(accepted_name("a.pdb", "   "), None);
        assert_eq!(accepted_name("a.pdb", ""), None);
    }
}
