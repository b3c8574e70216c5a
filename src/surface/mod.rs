//! The rendering capability the viewer drives.
//!
//! The 3D engine is opaque to the rest of the crate: a [`RenderBackend`]
//! creates [`Surface`]s bound to a [`MountPoint`], and a surface accepts
//! relative camera commands. Every render pass publishes a
//! [`FrameSnapshot`] on the surface's [`SurfaceOutput`], which is what a
//! capture stream reads.

/// Orbital camera used by the headless surface.
pub mod camera;
/// Surface implementation that keeps camera state without a GPU.
pub mod headless;
/// Shared drawable output of a surface.
pub mod output;

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use self::output::{FrameSnapshot, SurfaceOutput};
use crate::{
    error::MolcapError,
    model::ModelFormat,
    options::{StyleOptions, ViewerOptions},
};

/// A screen-space camera axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
    /// Axis pointing out of the screen.
    Z,
}

impl Axis {
    /// Unit vector along the axis.
    #[must_use]
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }
}

/// Spin axis choice offered by the panel (`x`, `y`, `z` or `none`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SpinAxis {
    /// No spin.
    None,
    /// Spin around the horizontal axis.
    X,
    /// Spin around the vertical axis.
    #[default]
    Y,
    /// Spin around the view axis.
    Z,
}

impl SpinAxis {
    /// The camera axis, or `None` for [`SpinAxis::None`].
    #[must_use]
    pub fn axis(self) -> Option<Axis> {
        match self {
            Self::None => None,
            Self::X => Some(Axis::X),
            Self::Y => Some(Axis::Y),
            Self::Z => Some(Axis::Z),
        }
    }

    /// Lowercase name used by the UI.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

impl FromStr for SpinAxis {
    type Err = MolcapError;

    /// Accepts `x|y|z|none` and the `vx|vy|vz` spellings used by web
    /// viewers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "x" | "vx" => Ok(Self::X),
            "y" | "vy" => Ok(Self::Y),
            "z" | "vz" => Ok(Self::Z),
            other => Err(MolcapError::InvalidInput(format!(
                "unknown spin axis '{other}' (expected x, y, z or none)"
            ))),
        }
    }
}

impl fmt::Display for SpinAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Continuous rotation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Axis of rotation.
    pub axis: Axis,
    /// Speed in spin units (one unit is [`SPIN_DEGREES_PER_UNIT`] degrees
    /// per second).
    pub speed: f32,
}

/// Degrees per second covered by one unit of spin speed.
pub const SPIN_DEGREES_PER_UNIT: f32 = 60.0;

/// Screen region a surface is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    /// Identifier of the region (element id, window label, ...).
    pub id: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl MountPoint {
    /// Mount point sized from the viewer options.
    #[must_use]
    pub fn from_options(id: impl Into<String>, options: &ViewerOptions) -> Self {
        Self {
            id: id.into(),
            width: options.width.max(1),
            height: options.height.max(1),
        }
    }
}

/// Creates rendering surfaces.
pub trait RenderBackend {
    /// Instantiate a surface on `mount`.
    ///
    /// Fails with [`MolcapError::EnvironmentUnavailable`] when the host has
    /// no rendering capability.
    fn create_surface(
        &mut self,
        mount: &MountPoint,
        options: &ViewerOptions,
    ) -> Result<Box<dyn Surface>, MolcapError>;
}

/// One live rendering context.
///
/// Dropping the surface releases it; its [`SurfaceOutput`] stops being live.
pub trait Surface {
    /// Parse and add a model.
    fn load_model(
        &mut self,
        text: &str,
        format: ModelFormat,
    ) -> Result<(), MolcapError>;

    /// Apply a style to every loaded atom.
    fn set_style(&mut self, style: &StyleOptions);

    /// Fit the camera to the bounding volume of the loaded models.
    fn zoom_to(&mut self);

    /// Draw one frame to the output.
    fn render(&mut self);

    /// Translate the view by `(dx, dy)` surface units, `+y` up.
    fn translate(&mut self, dx: f32, dy: f32);

    /// Rotate the view by `angle_deg` degrees about `axis`.
    fn rotate(&mut self, angle_deg: f32, axis: Axis);

    /// Multiply the zoom level by `factor`.
    fn zoom(&mut self, factor: f32);

    /// Start, replace or stop (`None`) the spin animation.
    fn spin(&mut self, spin: Option<Spin>);

    /// Advance animations by `dt` seconds. Returns `true` if the view changed
    /// and needs a render.
    fn advance(&mut self, dt: f32) -> bool;

    /// The drawable output that capture streams read from.
    fn output(&self) -> SurfaceOutput;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_axis_parsing() {
        assert_eq!("x".parse::<SpinAxis>().unwrap(), SpinAxis::X);
        assert_eq!(" VY ".parse::<SpinAxis>().unwrap(), SpinAxis::Y);
        assert_eq!("vz".parse::<SpinAxis>().unwrap(), SpinAxis::Z);
        assert_eq!("none".parse::<SpinAxis>().unwrap(), SpinAxis::None);
        assert!("w".parse::<SpinAxis>().is_err());
        assert!("".parse::<SpinAxis>().is_err());
    }

    #[test]
    fn spin_axis_maps_to_camera_axis() {
        assert_eq!(SpinAxis::None.axis(), None);
        assert_eq!(SpinAxis::Z.axis(), Some(Axis::Z));
        assert_eq!(Axis::X.unit(), Vec3::X);
    }

    #[test]
    fn mount_point_is_never_empty() {
        let mut opts = ViewerOptions::default();
        opts.width = 0;
        let mount = MountPoint::from_options("viewer", &opts);
        assert_eq!(mount.width, 1);
        assert_eq!(mount.height, 600);
    }
}
