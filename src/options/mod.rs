//! Viewer, control and recording options with TOML file support.
//!
//! Options serialize to/from TOML. Every section uses `#[serde(default)]` so
//! a partial file (e.g. only overriding `[recording]`) works.

mod controls;
mod recording;
mod viewer;

use std::path::Path;

pub use controls::ControlOptions;
pub use recording::RecordingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use viewer::{
    ColorProperty, Gradient, Representation, StyleOptions, ViewerOptions,
};

use crate::error::MolcapError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Rendering surface parameters.
    pub viewer: ViewerOptions,
    /// Panel button step sizes and spin defaults.
    pub controls: ControlOptions,
    /// Clip recording parameters.
    pub recording: RecordingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, MolcapError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| MolcapError::OptionsParse(e.to_string()))
    }

    /// Load options from `path` if it exists, falling back to defaults.
    ///
    /// A file that exists but fails to parse is reported and ignored.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(options) => options,
            Err(e) => {
                log::warn!("ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), MolcapError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MolcapError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
