//! Which screen is showing and which file is selected.

use std::fmt;
use std::str::FromStr;

use crate::{error::MolcapError, model::FileId};

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// File upload.
    #[default]
    Upload,
    /// 3D viewer of the active file.
    Viewer,
    /// Upload history.
    History,
}

impl Tab {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Viewer => "viewer",
            Self::History => "history",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = MolcapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upload" => Ok(Self::Upload),
            "viewer" => Ok(Self::Viewer),
            "history" => Ok(Self::History),
            other => Err(MolcapError::InvalidInput(format!("unknown tab: {other}"))),
        }
    }
}

/// Active tab plus the active file id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    tab: Tab,
    active_file: Option<FileId>,
}

impl NavigationState {
    /// Start on the upload screen with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current screen.
    #[must_use]
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Selected file.
    #[must_use]
    pub fn active_file(&self) -> Option<&FileId> {
        self.active_file.as_ref()
    }

    /// Switch screens.
    pub fn show(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Select `id` and open the viewer.
    pub fn open(&mut self, id: FileId) {
        self.active_file = Some(id);
        self.tab = Tab::Viewer;
    }

    /// Deselect `id` if it is the active file. Returns whether it was.
    pub fn forget(&mut self, id: &FileId) -> bool {
        if self.active_file.as_ref() == Some(id) {
            self.active_file = None;
            true
        } else {
            false
        }
    }

    /// Deselect whatever is active.
    pub fn clear_active(&mut self) {
        self.active_file = None;
    }
}
