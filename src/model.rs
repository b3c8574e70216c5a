//! Uploaded structure files and the borrowed view the viewer consumes.

use std::fmt;
use std::path::Path;

use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

/// Length of generated file ids.
const ID_LEN: usize = 21;

/// Stable unique identifier of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Generate a new random alphanumeric id.
    #[must_use]
    pub fn generate() -> Self {
        let id = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FileId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structure file formats the viewer accepts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    /// Protein Data Bank text format.
    #[default]
    Pdb,
    /// Plain XYZ coordinates.
    Xyz,
}

impl ModelFormat {
    /// Infer the format from a file name's extension (case-insensitive).
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "pdb" => Some(Self::Pdb),
            "xyz" => Some(Self::Xyz),
            _ => None,
        }
    }

    /// Format name as understood by the rendering surface.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdb => "pdb",
            Self::Xyz => "xyz",
        }
    }
}

/// One uploaded structure file as kept in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Stable unique identifier.
    pub id: FileId,
    /// Display name (initially the uploaded file name).
    pub name: String,
    /// Structure text.
    pub content: String,
    /// Size of the uploaded file in bytes.
    pub size: u64,
    /// Upload time, milliseconds since the Unix epoch.
    pub stored_at: u64,
    /// Format detected at upload; kept so renaming cannot lose it.
    #[serde(default)]
    pub format: ModelFormat,
}

impl FileRecord {
    /// Create a record with a fresh id, stamped with the current time.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        content: String,
        size: u64,
        format: ModelFormat,
    ) -> Self {
        let stored_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        Self {
            id: FileId::generate(),
            name: name.into(),
            content,
            size,
            stored_at,
            format,
        }
    }

    /// Borrow the parts the viewer needs.
    #[must_use]
    pub fn as_content(&self) -> ModelContent<'_> {
        ModelContent {
            id: &self.id,
            name: &self.name,
            text: &self.content,
            format: self.format,
        }
    }
}

/// Immutable view of one structure handed to a viewer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelContent<'a> {
    /// Identity of the file the text came from.
    pub id: &'a FileId,
    /// Display name.
    pub name: &'a str,
    /// Structure text.
    pub text: &'a str,
    /// Text format.
    pub format: ModelFormat,
}
