use glam::{Mat4, Quat, Vec2, Vec3};

use super::Axis;

/// Distance padding applied when fitting the camera to a model.
const FIT_PADDING: f32 = 1.5;

/// Turntable camera: the model rotates in front of a fixed eye.
///
/// Relative commands accumulate into the model rotation, a screen-space pan
/// offset and a zoom level. None of them are tracked for exact inversion, so
/// zooming by 1.2 then 0.8 leaves the zoom at 0.96.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    rotation: Quat,
    focus_point: Vec3,
    pan_offset: Vec2,
    distance: f32,
    zoom: f32,
    fovy: f32,
    aspect: f32,
    viewport_height: f32,
}

impl OrbitCamera {
    /// Camera for a `width`×`height` viewport with the given vertical field
    /// of view in degrees.
    #[must_use]
    pub fn new(width: u32, height: u32, fovy: f32) -> Self {
        let height = height.max(1) as f32;
        Self {
            rotation: Quat::IDENTITY,
            focus_point: Vec3::ZERO,
            pan_offset: Vec2::ZERO,
            distance: 150.0,
            zoom: 1.0,
            fovy: fovy.clamp(1.0, 170.0),
            aspect: width.max(1) as f32 / height,
            viewport_height: height,
        }
    }

    /// Center on the centroid of `positions` and back off until the bounding
    /// sphere fits. Resets pan and zoom; keeps rotation.
    pub fn fit_to_positions(&mut self, positions: &[Vec3]) {
        if positions.is_empty() {
            return;
        }

        let centroid: Vec3 =
            positions.iter().copied().sum::<Vec3>() / positions.len() as f32;
        let radius = positions
            .iter()
            .map(|p| (*p - centroid).length())
            .fold(0.0f32, f32::max)
            .max(1.0);

        self.focus_point = centroid;
        self.pan_offset = Vec2::ZERO;
        self.zoom = 1.0;

        let half_fov = (self.fovy.to_radians() / 2.0).tan();
        self.distance = radius / half_fov * FIT_PADDING;
    }

    /// Shift the view by `delta` pixels, `+y` up.
    pub fn pan(&mut self, delta: Vec2) {
        // Pixels to world units at the focus plane
        let visible_height =
            2.0 * self.eye_distance() * (self.fovy.to_radians() / 2.0).tan();
        self.pan_offset += delta * (visible_height / self.viewport_height);
    }

    /// Rotate the model by `angle_deg` about a screen axis.
    pub fn rotate(&mut self, angle_deg: f32, axis: Axis) {
        let turn = Quat::from_axis_angle(axis.unit(), angle_deg.to_radians());
        self.rotation = (turn * self.rotation).normalize();
    }

    /// Multiply the zoom level. Non-positive or non-finite factors are
    /// ignored.
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom *= factor;
        }
    }

    /// Accumulated zoom level.
    #[must_use]
    pub fn zoom_level(&self) -> f32 {
        self.zoom
    }

    /// Current model rotation.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Accumulated pan offset in world units.
    #[must_use]
    pub fn pan_offset(&self) -> Vec2 {
        self.pan_offset
    }

    /// Center the camera orbits.
    #[must_use]
    pub fn focus_point(&self) -> Vec3 {
        self.focus_point
    }

    fn eye_distance(&self) -> f32 {
        self.distance / self.zoom
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn view_proj(&self) -> Mat4 {
        let eye_distance = self.eye_distance();
        let view = Mat4::look_at_rh(
            Vec3::new(0.0, 0.0, eye_distance),
            Vec3::ZERO,
            Vec3::Y,
        );
        let model = Mat4::from_translation(self.pan_offset.extend(0.0))
            * Mat4::from_quat(self.rotation)
            * Mat4::from_translation(-self.focus_point);
        let znear = (eye_distance * 0.01).max(0.01);
        let proj = Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            znear,
            eye_distance * 4.0 + znear,
        );
        proj * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(800, 600, 20.0)
    }

    #[test]
    fn fit_centers_on_centroid() {
        let mut cam = camera();
        cam.zoom(2.0);
        cam.fit_to_positions(&[Vec3::new(-10.0, 0.0, 0.0), Vec3::new(10.0, 4.0, 2.0)]);
        assert!((cam.focus_point() - Vec3::new(0.0, 2.0, 1.0)).length() < 1e-5);
        assert_eq!(cam.zoom_level(), 1.0);
    }

    #[test]
    fn fit_ignores_empty_positions() {
        let mut cam = camera();
        let before = cam.clone();
        cam.fit_to_positions(&[]);
        assert_eq!(cam, before);
    }

    #[test]
    fn zoom_is_multiplicative() {
        let mut cam = camera();
        cam.zoom(1.2);
        cam.zoom(0.8);
        assert!((cam.zoom_level() - 0.96).abs() < 1e-6);
        cam.zoom(0.0);
        cam.zoom(f32::NAN);
        assert!((cam.zoom_level() - 0.96).abs() < 1e-6);
    }

    #[test]
    fn rotations_compose() {
        let mut cam = camera();
        cam.rotate(10.0, Axis::Y);
        cam.rotate(-10.0, Axis::Y);
        assert!(cam.rotation().angle_between(Quat::IDENTITY) < 1e-4);
        cam.rotate(90.0, Axis::X);
        let up = cam.rotation() * Vec3::Y;
        assert!((up - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn pan_moves_focus_plane_offset() {
        let mut cam = camera();
        cam.pan(Vec2::new(20.0, -20.0));
        let offset = cam.pan_offset();
        assert!(offset.x > 0.0);
        assert!(offset.y < 0.0);
        assert!((offset.x + offset.y).abs() < 1e-5);
    }

    #[test]
    fn view_proj_changes_with_zoom() {
        let mut cam = camera();
        let before = cam.view_proj();
        cam.zoom(1.2);
        assert_ne!(before, cam.view_proj());
    }
}
