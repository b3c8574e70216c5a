use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Molecular representation drawn by the rendering surface.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// Secondary-structure cartoon.
    #[default]
    Cartoon,
    /// Bonds as sticks.
    Stick,
    /// Atoms as van der Waals spheres.
    Sphere,
    /// Bonds as thin lines.
    Line,
}

/// Per-atom property driving the color gradient.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ColorProperty {
    /// Crystallographic temperature factor (the `b` column).
    #[default]
    BFactor,
    /// Chemical element.
    Element,
    /// Chain identifier.
    Chain,
}

/// Named color gradient.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Gradient {
    /// Red → orange → yellow → green → blue.
    #[default]
    Roygb,
    /// Red → white → blue.
    Rwb,
    /// Rainbow sine bands.
    Sinebow,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Style", inline)]
#[serde(default)]
/// Style applied to every loaded model.
pub struct StyleOptions {
    /// Representation to draw.
    #[schemars(title = "Representation")]
    pub representation: Representation,
    /// Property mapped onto the gradient.
    #[schemars(title = "Color By")]
    pub color_by: ColorProperty,
    /// Gradient used for coloring.
    #[schemars(title = "Gradient")]
    pub gradient: Gradient,
    /// Property value mapped to the start of the gradient.
    #[schemars(title = "Gradient Min", range(min = 0.0, max = 200.0))]
    pub min: f32,
    /// Property value mapped to the end of the gradient.
    #[schemars(title = "Gradient Max", range(min = 0.0, max = 200.0))]
    pub max: f32,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            representation: Representation::Cartoon,
            color_by: ColorProperty::BFactor,
            gradient: Gradient::Roygb,
            min: 50.0,
            max: 90.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Viewer", inline)]
#[serde(default)]
/// Rendering surface creation parameters.
pub struct ViewerOptions {
    /// Background color name or hex string.
    #[schemars(title = "Background")]
    pub background_color: String,
    /// Surface width in pixels.
    #[schemars(title = "Width", range(min = 64, max = 4096))]
    pub width: u32,
    /// Surface height in pixels.
    #[schemars(title = "Height", range(min = 64, max = 4096))]
    pub height: u32,
    /// Vertical field of view in degrees.
    #[schemars(skip)]
    pub fovy: f32,
    /// Model style.
    pub style: StyleOptions,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            background_color: "white".into(),
            width: 800,
            height: 600,
            fovy: 20.0,
            style: StyleOptions::default(),
        }
    }
}
