//! Binding of one loaded model to one rendering surface.

use crate::{
    error::MolcapError,
    model::{FileId, ModelContent},
    notice::{Notice, Notices},
    options::ViewerOptions,
    surface::{Axis, MountPoint, RenderBackend, Spin, SpinAxis, Surface, SurfaceOutput},
};

struct LoadedModel {
    file_id: FileId,
    surface: Box<dyn Surface>,
}

/// Owns at most one live surface and forwards camera commands to it.
///
/// Commands issued while nothing is loaded are ignored. Load failures are
/// logged and queued as notices; the session then simply stays unloaded.
pub struct ViewerSession {
    backend: Box<dyn RenderBackend>,
    options: ViewerOptions,
    loaded: Option<LoadedModel>,
    spin: Option<Spin>,
    notices: Notices,
}

impl ViewerSession {
    /// Session creating surfaces through `backend`.
    #[must_use]
    pub fn new(backend: Box<dyn RenderBackend>, options: ViewerOptions) -> Self {
        Self {
            backend,
            options,
            loaded: None,
            spin: None,
            notices: Notices::default(),
        }
    }

    /// Whether a surface is live.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Identity of the loaded model.
    #[must_use]
    pub fn loaded_file(&self) -> Option<&FileId> {
        self.loaded.as_ref().map(|m| &m.file_id)
    }

    /// The spin applied to the surface, if any.
    #[must_use]
    pub fn spin(&self) -> Option<Spin> {
        self.spin
    }

    /// Capturable output of the live surface.
    #[must_use]
    pub fn output(&self) -> Option<SurfaceOutput> {
        self.loaded.as_ref().map(|m| m.surface.output())
    }

    /// Pop the oldest pending notice.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.take()
    }

    /// Remove every pending notice.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Create a surface on `mount` showing `content`.
    ///
    /// Any previous surface is released first. The camera is fitted to the
    /// model and one frame is rendered; the current spin setting carries
    /// over.
    pub fn load(&mut self, content: ModelContent<'_>, mount: &MountPoint) {
        self.unload();

        let mut surface = match self.backend.create_surface(mount, &self.options)
        {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("cannot show {}: {e}", content.name);
                self.notices.push(Notice::EnvironmentUnavailable(e.to_string()));
                return;
            }
        };
        if let Err(e) = surface.load_model(content.text, content.format) {
            log::error!("cannot show {}: {e}", content.name);
            let notice = match e {
                MolcapError::ModelLoad(msg) => Notice::ModelLoad(msg),
                other => Notice::EnvironmentUnavailable(other.to_string()),
            };
            self.notices.push(notice);
            return;
        }

        surface.set_style(&self.options.style);
        surface.zoom_to();
        surface.render();
        if self.spin.is_some() {
            surface.spin(self.spin);
        }
        log::info!("loaded {} ({})", content.name, content.id);
        self.loaded = Some(LoadedModel {
            file_id: content.id.clone(),
            surface,
        });
    }

    /// Release the surface, if any.
    pub fn unload(&mut self) {
        if let Some(model) = self.loaded.take() {
            log::debug!("releasing surface for {}", model.file_id);
        }
    }

    /// Translate by `(dx, -dy)`: UI `+y` is down, surface `+y` is up.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.with_surface(|s| s.translate(dx, -dy));
    }

    /// Rotate by `angle_deg` about `axis`.
    pub fn rotate(&mut self, angle_deg: f32, axis: Axis) {
        self.with_surface(|s| s.rotate(angle_deg, axis));
    }

    /// Multiply the zoom by `factor` (> 1 zooms in).
    pub fn zoom(&mut self, factor: f32) {
        self.with_surface(|s| s.zoom(factor));
    }

    /// Start, retarget or stop the spin animation.
    ///
    /// Axis `none`, a non-finite speed or a speed ≤ 0 all mean no spin.
    /// A change of axis or speed replaces the running spin in one call.
    pub fn set_spin(&mut self, active: bool, axis: SpinAxis, speed: f32) {
        let spin = axis
            .axis()
            .filter(|_| active && speed.is_finite() && speed > 0.0)
            .map(|axis| Spin { axis, speed });
        if spin == self.spin {
            return;
        }
        self.spin = spin;
        if let Some(model) = &mut self.loaded {
            model.surface.spin(spin);
        }
    }

    /// Advance the spin animation by `dt` seconds, rendering if it moved.
    pub fn update(&mut self, dt: f32) {
        if let Some(model) = &mut self.loaded {
            if model.surface.advance(dt) {
                model.surface.render();
            }
        }
    }

    fn with_surface(&mut self, command: impl FnOnce(&mut dyn Surface)) {
        let Some(model) = &mut self.loaded else {
            return;
        };
        command(model.surface.as_mut());
        model.surface.render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{cube_record, MockRender, SurfaceCall};

    fn session() -> (ViewerSession, MockRender) {
        let render = MockRender::new();
        let session =
            ViewerSession::new(Box::new(render.clone()), ViewerOptions::default());
        (session, render)
    }

    fn mount() -> MountPoint {
        MountPoint::from_options("viewer", &ViewerOptions::default())
    }

    #[test]
    fn commands_before_load_are_ignored() {
        let (mut session, render) = session();
        session.pan(20.0, 0.0);
        session.rotate(10.0, Axis::X);
        session.zoom(1.2);
        session.set_spin(true, SpinAxis::Y, 1.0);
        session.update(0.016);
        assert!(!session.is_loaded());
        assert!(session.output().is_none());
        assert_eq!(render.created(), 0);
        assert!(render.calls().is_empty());
    }

    #[test]
    fn load_fits_and_renders_once() {
        let (mut session, render) = session();
        let record = cube_record("cube.pdb");
        session.load(record.as_content(), &mount());
        assert!(session.is_loaded());
        assert_eq!(session.loaded_file(), Some(&record.id));
        assert_eq!(
            render.calls(),
            vec![
                SurfaceCall::Load(record.content.clone()),
                SurfaceCall::Style,
                SurfaceCall::ZoomTo,
                SurfaceCall::Render,
            ]
        );
    }

    #[test]
    fn pan_flips_vertical_axis_and_renders() {
        let (mut session, render) = session();
        session.load(cube_record("cube.pdb").as_content(), &mount());
        render.clear_calls();
        session.pan(0.0, 20.0);
        assert_eq!(
            render.calls(),
            vec![SurfaceCall::Translate(0.0, -20.0), SurfaceCall::Render]
        );
    }

    #[test]
    fn zoom_is_multiplicative() {
        let (mut session, render) = session();
        session.load(cube_record("cube.pdb").as_content(), &mount());
        session.zoom(1.2);
        session.zoom(0.8);
        assert!((render.zoom() - 0.96).abs() < 1e-6);
        let frame = session.output().unwrap().latest().unwrap();
        assert!((frame.zoom - 0.96).abs() < 1e-6);
    }

    #[test]
    fn reload_releases_previous_surface() {
        let (mut session, render) = session();
        session.load(cube_record("a.pdb").as_content(), &mount());
        let first_output = session.output().unwrap();

        session.unload();
        assert_eq!(render.live_surfaces(), 0);
        session.load(cube_record("b.pdb").as_content(), &mount());
        assert_eq!(render.live_surfaces(), 1);
        assert!(!first_output.is_live());

        // Loading without unloading still never holds two
        session.load(cube_record("c.pdb").as_content(), &mount());
        assert_eq!(render.live_surfaces(), 1);
        assert_eq!(render.created(), 3);
    }

    #[test]
    fn spin_toggles_and_retargets() {
        let (mut session, render) = session();
        session.load(cube_record("cube.pdb").as_content(), &mount());
        render.clear_calls();

        session.set_spin(true, SpinAxis::Y, 2.0);
        session.set_spin(true, SpinAxis::X, 2.0);
        assert_eq!(render.spin(), Some(Spin { axis: Axis::X, speed: 2.0 }));

        session.set_spin(false, SpinAxis::X, 2.0);
        assert_eq!(render.spin(), None);
        assert_eq!(session.spin(), None);

        // One call per change, never a stop between old and new axis
        assert_eq!(
            render.calls(),
            vec![
                SurfaceCall::Spin(Some(Spin { axis: Axis::Y, speed: 2.0 })),
                SurfaceCall::Spin(Some(Spin { axis: Axis::X, speed: 2.0 })),
                SurfaceCall::Spin(None),
            ]
        );
    }

    #[test]
    fn stalled_speed_means_no_spin() {
        let (mut session, render) = session();
        session.load(cube_record("cube.pdb").as_content(), &mount());
        session.set_spin(true, SpinAxis::Z, 0.0);
        assert_eq!(session.spin(), None);
        session.set_spin(true, SpinAxis::Z, -1.0);
        session.set_spin(true, SpinAxis::Z, f32::NAN);
        session.set_spin(true, SpinAxis::None, 3.0);
        assert_eq!(session.spin(), None);
        assert!(render.calls().iter().all(|c| !matches!(c, SurfaceCall::Spin(_))));
    }

    #[test]
    fn spin_survives_model_swap() {
        let (mut session, render) = session();
        session.set_spin(true, SpinAxis::Y, 1.0);
        session.load(cube_record("cube.pdb").as_content(), &mount());
        assert_eq!(render.spin(), Some(Spin { axis: Axis::Y, speed: 1.0 }));
        render.clear_calls();
        session.update(0.016);
        assert_eq!(render.calls(), vec![SurfaceCall::Render]);
    }

    #[test]
    fn unavailable_renderer_degrades() {
        let (mut session, render) = session();
        render.set_unavailable(true);
        session.load(cube_record("cube.pdb").as_content(), &mount());
        assert!(!session.is_loaded());
        assert!(matches!(
            session.take_notice(),
            Some(Notice::EnvironmentUnavailable(_))
        ));
        session.zoom(2.0);
        assert!(render.calls().is_empty());
    }

    #[test]
    fn failed_model_load_releases_surface() {
        let (mut session, render) = session();
        let mut record = cube_record("empty.pdb");
        record.content.clear();
        session.load(record.as_content(), &mount());
        assert!(!session.is_loaded());
        assert_eq!(render.live_surfaces(), 0);
        assert_eq!(
            session.drain_notices(),
            vec![Notice::ModelLoad("empty".into())]
        );
    }
}
