use super::{accepted_name, FileRepository};
use crate::{
    error::MolcapError,
    model::{FileId, FileRecord},
};

/// History kept only for the lifetime of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryHistory {
    records: Vec<FileRecord>,
}

impl MemoryHistory {
    /// Empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// History holding `records`, oldest first.
    #[must_use]
    pub fn from_records(records: Vec<FileRecord>) -> Self {
        Self { records }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FileRepository for MemoryHistory {
    fn list(&self) -> &[FileRecord] {
        &self.records
    }

    fn add(&mut self, record: FileRecord) -> Result<(), MolcapError> {
        self.records.push(record);
        Ok(())
    }

    fn rename(&mut self, id: &FileId, name: &str) -> Result<bool, MolcapError> {
        let Some(record) = self.records.iter_mut().find(|r| &r.id == id) else {
            return Ok(false);
        };
        let Some(name) = accepted_name(&record.name, name) else {
            return Ok(false);
        };
        record.name = name;
        Ok(true)
    }

    fn remove(
        &mut self,
        id: &FileId,
    ) -> Result<Option<FileRecord>, MolcapError> {
        let index = self.records.iter().position(|r| &r.id == id);
        Ok(index.map(|i| self.records.remove(i)))
    }

    fn clear(&mut self) -> Result<(), MolcapError> {
        self.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::cube_record;

    #[test]
    fn add_keeps_upload_order() {
        let mut history = MemoryHistory::new();
        let a = cube_record("a.pdb");
        let b = cube_record("b.pdb");
        history.add(a.clone()).unwrap();
        history.add(b.clone()).unwrap();
        let names: Vec<_> = history.list().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a.pdb", "b.pdb"]);
        assert_eq!(history.get(&b.id), Some(&b));
    }

    #[test]
    fn rename_only_applies_real_changes() {
        let record = cube_record("a.pdb");
        let id = record.id.clone();
        let mut history = MemoryHistory::from_records(vec![record]);

        assert!(!history.rename(&id, "  ").unwrap());
        assert!(!history.rename(&id, "a.pdb").unwrap());
        assert!(!history.rename(&FileId::from("missing"), "x").unwrap());
        assert!(history.rename(&id, " ubiquitin ").unwrap());
        assert_eq!(history.get(&id).unwrap().name, "ubiquitin");
    }

    #[test]
    fn remove_and_clear() {
        let a = cube_record("a.pdb");
        let b = cube_record("b.pdb");
        let mut history = MemoryHistory::from_records(vec![a.clone(), b.clone()]);

        assert_eq!(history.remove(&a.id).unwrap(), Some(a.clone()));
        assert_eq!(history.remove(&a.id).unwrap(), None);
        assert_eq!(history.len(), 1);

        history.clear().unwrap();
        assert!(history.is_empty());
        assert!(history.get(&b.id).is_none());
    }
}
