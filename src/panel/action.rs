//! Everything a user can do on the viewer panel.
//!
//! Front ends translate button presses and form input into
//! [`PanelAction`]s and hand them to
//! [`ViewerPanel::dispatch`](super::ViewerPanel::dispatch).

use std::path::PathBuf;

use crate::surface::{Axis, SpinAxis};

/// Direction of a pan button, in screen terms (`Up` moves the view up).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the top of the screen.
    Up,
    /// Toward the bottom of the screen.
    Down,
    /// Toward the left edge.
    Left,
    /// Toward the right edge.
    Right,
}

impl Direction {
    /// Unit offset handed to [`ViewerSession::pan`](crate::session::ViewerSession::pan).
    #[must_use]
    pub fn offset(self) -> (f32, f32) {
        match self {
            Self::Up => (0.0, 1.0),
            Self::Down => (0.0, -1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }
}

/// One press of a rotate button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotateStep {
    /// Rotation axis. The panel offers `x` and `y`.
    pub axis: Axis,
    /// `true` for the positive direction.
    pub positive: bool,
}

/// A user action on the viewer panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    /// Flip the spin toggle.
    ToggleSpin,
    /// Pick the spin axis.
    SetSpinAxis(SpinAxis),
    /// Type a spin speed. Clamped to at least 1.
    SetSpinSpeed(f32),
    /// Press a pan button.
    Pan(Direction),
    /// Press a rotate button.
    Rotate(RotateStep),
    /// Press zoom in.
    ZoomIn,
    /// Press zoom out.
    ZoomOut,
    /// Start a fixed-length recording.
    Record,
    /// Finish the running recording early.
    StopRecording,
    /// Discard the finished recording.
    ClearRecording,
    /// Save the finished recording into a directory.
    Download {
        /// Target directory.
        dir: PathBuf,
    },
}
