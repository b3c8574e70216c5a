//! Crate-level error types.

use std::fmt;

/// Errors produced by the molcap crate.
///
/// UI-facing operations on the viewer panel never return these; they are
/// absorbed into [`Notice`](crate::notice::Notice)s. This type is for the
/// I/O-level APIs (history persistence, ingestion, options, downloads) and
/// for the backend traits the core drives.
#[derive(Debug)]
pub enum MolcapError {
    /// The rendering or capture capability is missing from the host.
    EnvironmentUnavailable(String),
    /// A structure could not be loaded into a rendering surface.
    ModelLoad(String),
    /// An uploaded file is not a supported structure format.
    FileFormatRejected(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// History (JSON) parsing/serialization failure.
    History(serde_json::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A value entered at the UI boundary could not be parsed.
    InvalidInput(String),
}

impl fmt::Display for MolcapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvironmentUnavailable(msg) => {
                write!(f, "environment unavailable: {msg}")
            }
            Self::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            Self::FileFormatRejected(name) => {
                write!(f, "unsupported structure file: {name}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::History(e) => write!(f, "history store error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for MolcapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::History(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MolcapError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for MolcapError {
    fn from(e: serde_json::Error) -> Self {
        Self::History(e)
    }
}
