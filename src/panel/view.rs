use crate::{recording::ArtifactInfo, recording::RecordingPhase, surface::SpinAxis};

/// Render-ready snapshot of the viewer panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    /// Display name of the bound file.
    pub title: Option<String>,
    /// Whether a surface is showing the file.
    pub loaded: bool,
    /// Recorder phase.
    pub phase: RecordingPhase,
    /// Label of the record button.
    pub record_label: &'static str,
    /// Whether the record button is enabled.
    pub can_record: bool,
    /// Whether a running recording can be stopped early.
    pub can_stop: bool,
    /// Whether there is a recording to clear or download.
    pub can_clear: bool,
    /// The finished recording.
    pub artifact: Option<ArtifactInfo>,
    /// File name a download would be saved under.
    pub download_name: Option<String>,
    /// Spin toggle state.
    pub spin_enabled: bool,
    /// Selected spin axis.
    pub spin_axis: SpinAxis,
    /// Spin speed input.
    pub spin_speed: f32,
    /// One-line status text.
    pub status: String,
}

impl PanelView {
    /// Placeholder shown when no file is selected.
    pub const EMPTY_TITLE: &'static str = "No file selected";

    /// Title text, falling back to [`Self::EMPTY_TITLE`].
    #[must_use]
    pub fn title_or_placeholder(&self) -> &str {
        self.title.as_deref().unwrap_or(Self::EMPTY_TITLE)
    }
}
