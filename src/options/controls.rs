use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::surface::SpinAxis;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Controls", inline)]
#[serde(default)]
/// Step sizes of the panel's camera buttons and initial spin settings.
pub struct ControlOptions {
    /// Pan distance per button press, in surface units.
    #[schemars(title = "Pan Step", range(min = 1.0, max = 200.0), extend("step" = 1.0))]
    pub pan_step: f32,
    /// Rotation per button press, in degrees.
    #[schemars(title = "Rotate Step", range(min = 1.0, max = 90.0), extend("step" = 1.0))]
    pub rotate_step: f32,
    /// Zoom factor of the zoom-in button.
    #[schemars(title = "Zoom In", range(min = 1.01, max = 3.0), extend("step" = 0.01))]
    pub zoom_in_factor: f32,
    /// Zoom factor of the zoom-out button.
    #[schemars(title = "Zoom Out", range(min = 0.1, max = 0.99), extend("step" = 0.01))]
    pub zoom_out_factor: f32,
    /// Whether spin is enabled when a panel is created.
    #[schemars(title = "Spin On Open")]
    pub spin_enabled: bool,
    /// Initial spin axis.
    #[schemars(title = "Spin Axis")]
    pub spin_axis: SpinAxis,
    /// Initial spin speed.
    #[schemars(title = "Spin Speed", range(min = 1.0, max = 20.0), extend("step" = 1.0))]
    pub spin_speed: f32,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            pan_step: 20.0,
            rotate_step: 10.0,
            zoom_in_factor: 1.2,
            zoom_out_factor: 0.8,
            spin_enabled: false,
            spin_axis: SpinAxis::Y,
            spin_speed: 1.0,
        }
    }
}
