use glam::{Vec2, Vec3};

use super::{
    camera::OrbitCamera, Axis, FrameSnapshot, MountPoint, RenderBackend,
    Spin, Surface, SurfaceOutput, SPIN_DEGREES_PER_UNIT,
};
use crate::{
    error::MolcapError,
    model::ModelFormat,
    options::{StyleOptions, ViewerOptions},
};

/// Backend producing [`HeadlessSurface`]s.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    available: bool,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self { available: true }
    }
}

impl HeadlessBackend {
    /// A backend that can create surfaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend standing in for a host without rendering support.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { available: false }
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_surface(
        &mut self,
        mount: &MountPoint,
        options: &ViewerOptions,
    ) -> Result<Box<dyn Surface>, MolcapError> {
        if !self.available {
            return Err(MolcapError::EnvironmentUnavailable(format!(
                "no rendering support for '{}'",
                mount.id
            )));
        }
        log::debug!(
            "headless surface on '{}' ({}x{})",
            mount.id,
            mount.width,
            mount.height
        );
        Ok(Box::new(HeadlessSurface::new(mount, options)))
    }
}

/// Surface that tracks the camera and atom positions without drawing pixels.
///
/// Each render pass publishes the camera's view-projection on the output.
#[derive(Debug)]
pub struct HeadlessSurface {
    camera: OrbitCamera,
    atoms: Vec<Vec3>,
    style: StyleOptions,
    spin: Option<Spin>,
    frame_index: u64,
    output: SurfaceOutput,
}

impl HeadlessSurface {
    /// Create an empty surface sized to `mount`.
    #[must_use]
    pub fn new(mount: &MountPoint, options: &ViewerOptions) -> Self {
        Self {
            camera: OrbitCamera::new(mount.width, mount.height, options.fovy),
            atoms: Vec::new(),
            style: options.style.clone(),
            spin: None,
            frame_index: 0,
            output: SurfaceOutput::new(),
        }
    }

    /// Number of atoms across every loaded model.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Camera state.
    #[must_use]
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Active style.
    #[must_use]
    pub fn style(&self) -> &StyleOptions {
        &self.style
    }
}

impl Drop for HeadlessSurface {
    fn drop(&mut self) {
        self.output.release();
    }
}

impl Surface for HeadlessSurface {
    fn load_model(
        &mut self,
        text: &str,
        format: ModelFormat,
    ) -> Result<(), MolcapError> {
        let atoms = match format {
            ModelFormat::Pdb => pdb_coordinates(text),
            ModelFormat::Xyz => xyz_coordinates(text),
        };
        if atoms.is_empty() {
            return Err(MolcapError::ModelLoad(format!(
                "no atom coordinates found in {} text",
                format.as_str()
            )));
        }
        log::debug!("loaded {} atoms", atoms.len());
        self.atoms.extend(atoms);
        Ok(())
    }

    fn set_style(&mut self, style: &StyleOptions) {
        self.style = style.clone();
    }

    fn zoom_to(&mut self) {
        self.camera.fit_to_positions(&self.atoms);
    }

    fn render(&mut self) {
        self.frame_index += 1;
        self.output.publish(FrameSnapshot {
            index: self.frame_index,
            view_proj: self.camera.view_proj(),
            zoom: self.camera.zoom_level(),
            spin: self.spin,
        });
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.camera.pan(Vec2::new(dx, dy));
    }

    fn rotate(&mut self, angle_deg: f32, axis: Axis) {
        self.camera.rotate(angle_deg, axis);
    }

    fn zoom(&mut self, factor: f32) {
        self.camera.zoom(factor);
    }

    fn spin(&mut self, spin: Option<Spin>) {
        self.spin = spin;
    }

    fn advance(&mut self, dt: f32) -> bool {
        let Some(spin) = self.spin else {
            return false;
        };
        if !(dt.is_finite() && dt > 0.0) {
            return false;
        }
        self.camera
            .rotate(spin.speed * SPIN_DEGREES_PER_UNIT * dt, spin.axis);
        true
    }

    fn output(&self) -> SurfaceOutput {
        self.output.clone()
    }
}

/// Coordinates of `ATOM`/`HETATM` records (fixed columns 31-54).
fn pdb_coordinates(text: &str) -> Vec<Vec3> {
    text.lines()
        .filter(|line| line.starts_with("ATOM") || line.starts_with("HETATM"))
        .filter_map(|line| {
            let x = line.get(30..38)?.trim().parse().ok()?;
            let y = line.get(38..46)?.trim().parse().ok()?;
            let z = line.get(46..54)?.trim().parse().ok()?;
            Some(Vec3::new(x, y, z))
        })
        .collect()
}

/// Coordinates of an XYZ file: count line, comment line, `element x y z`.
fn xyz_coordinates(text: &str) -> Vec<Vec3> {
    let mut lines = text.lines();
    let Some(count) = lines.next().and_then(|l| l.trim().parse::<usize>().ok())
    else {
        return Vec::new();
    };
    lines
        .skip(1)
        .take(count)
        .filter_map(|line| {
            let mut fields = line.split_whitespace().skip(1);
            let x = fields.next()?.parse().ok()?;
            let y = fields.next()?.parse().ok()?;
            let z = fields.next()?.parse().ok()?;
            Some(Vec3::new(x, y, z))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pdb_fixture, PDB_CUBE_EDGE};

    fn surface() -> HeadlessSurface {
        let opts = ViewerOptions::default();
        HeadlessSurface::new(&MountPoint::from_options("test", &opts), &opts)
    }

    #[test]
    fn parses_pdb_atoms() {
        let atoms = pdb_coordinates(&pdb_fixture(PDB_CUBE_EDGE));
        assert_eq!(atoms.len(), 8);
        assert!(atoms.contains(&Vec3::new(PDB_CUBE_EDGE, 0.0, 0.0)));
    }

    #[test]
    fn skips_malformed_pdb_lines() {
        let text = "HEADER    TEST\nATOM      1  CA  ALA A   1      xx.000   0.000   0.000\nATOM short\nEND\n";
        assert!(pdb_coordinates(text).is_empty());
    }

    #[test]
    fn parses_xyz_atoms() {
        let text = "3\nwater\nO 0.0 0.0 0.0\nH 0.76 0.59 0.0\nH -0.76 0.59 0.0\n";
        let atoms = xyz_coordinates(text);
        assert_eq!(atoms.len(), 3);
        assert_eq!(atoms[1], Vec3::new(0.76, 0.59, 0.0));
        assert!(xyz_coordinates("water\n").is_empty());
    }

    #[test]
    fn load_without_atoms_fails() {
        let mut s = surface();
        assert!(s.load_model("HEADER only\n", ModelFormat::Pdb).is_err());
        assert_eq!(s.atom_count(), 0);
    }

    #[test]
    fn render_publishes_numbered_frames() {
        let mut s = surface();
        s.load_model(&pdb_fixture(PDB_CUBE_EDGE), ModelFormat::Pdb).unwrap();
        s.zoom_to();
        let output = s.output();
        s.render();
        s.render();
        assert_eq!(output.latest().map(|f| f.index), Some(2));
    }

    #[test]
    fn spin_advances_only_while_active() {
        let mut s = surface();
        assert!(!s.advance(0.1));
        s.spin(Some(Spin { axis: Axis::Y, speed: 1.0 }));
        assert!(s.advance(0.5));
        let turned = s.camera().rotation().angle_between(glam::Quat::IDENTITY);
        assert!((turned - 30f32.to_radians()).abs() < 1e-4);
        s.spin(None);
        assert!(!s.advance(0.5));
    }

    #[test]
    fn set_style_replaces_initial_style() {
        let mut s = surface();
        assert_eq!(s.style(), &StyleOptions::default());
        let style = StyleOptions {
            max: 80.0,
            ..StyleOptions::default()
        };
        s.set_style(&style);
        assert_eq!(s.style().max, 80.0);
    }

    #[test]
    fn dropping_surface_releases_output() {
        let s = surface();
        let output = s.output();
        assert!(output.is_live());
        drop(s);
        assert!(!output.is_live());
    }

    #[test]
    fn unavailable_backend_reports_environment() {
        let opts = ViewerOptions::default();
        let mount = MountPoint::from_options("viewer", &opts);
        let err = HeadlessBackend::unavailable()
            .create_surface(&mount, &opts)
            .err()
            .unwrap();
        assert!(matches!(err, MolcapError::EnvironmentUnavailable(_)));
        assert!(HeadlessBackend::new().create_surface(&mount, &opts).is_ok());
    }
}
