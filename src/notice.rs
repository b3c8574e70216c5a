//! One-shot user notifications.
//!
//! Viewer and recorder failures never cross the component boundary as
//! errors. They are queued here and drained by whoever owns the UI.

use std::collections::VecDeque;
use std::fmt;

/// A condition worth telling the user about once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The rendering or capture capability is missing or failed to start.
    EnvironmentUnavailable(String),
    /// The structure file could not be turned into a model.
    ModelLoad(String),
    /// A recording was requested with no loaded model.
    NoActiveSurface,
    /// The requested clip length cannot be scheduled.
    ClipLengthOutOfRange,
    /// The encoder produced no usable data; nothing was recorded.
    EmptyArtifact,
    /// An uploaded file is not a supported structure format.
    FileFormatRejected(String),
    /// Reading or writing a file failed.
    Io(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvironmentUnavailable(msg) => {
                write!(f, "viewer unavailable: {msg}")
            }
            Self::ModelLoad(msg) => {
                write!(f, "could not load structure: {msg}")
            }
            Self::NoActiveSurface => {
                write!(f, "load a structure before recording")
            }
            Self::ClipLengthOutOfRange => {
                write!(f, "recording failed: clip length is out of range")
            }
            Self::EmptyArtifact => {
                write!(f, "recording failed: no video data was captured")
            }
            Self::FileFormatRejected(name) => {
                write!(f, "please upload a PDB or XYZ file ({name})")
            }
            Self::Io(msg) => write!(f, "file error: {msg}"),
        }
    }
}

/// FIFO of pending notices.
#[derive(Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    /// Queue a notice.
    pub fn push(&mut self, notice: Notice) {
        self.queue.push_back(notice);
    }

    /// Pop the oldest pending notice.
    pub fn take(&mut self) -> Option<Notice> {
        self.queue.pop_front()
    }

    /// Remove and return every pending notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }
}
