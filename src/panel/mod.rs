//! The viewer screen: one bound file, its viewer session and its recorder.
//!
//! [`ViewerPanel`] is the composition root of the viewer. It keeps the
//! session surface and the recorder in step with whichever file is bound,
//! maps [`PanelAction`]s onto them and summarizes everything as a
//! [`PanelView`] for the front end to draw.

/// User actions.
pub mod action;
/// View snapshot.
pub mod view;

use std::path::{Path, PathBuf};

use web_time::Instant;

pub use self::action::{Direction, PanelAction, RotateStep};
pub use self::view::PanelView;
use crate::{
    capture::{CaptureBackend, SharedArtifacts},
    model::{FileId, FileRecord},
    notice::{Notice, Notices},
    options::{ControlOptions, Options},
    recording::{RecordingController, RecordingPhase},
    session::ViewerSession,
    surface::{MountPoint, RenderBackend, SpinAxis},
    util::format::{download_name, format_file_size},
};

/// Lowest speed the speed input accepts.
pub const MIN_SPIN_SPEED: f32 = 1.0;

/// Spin form state, kept independently of whether a model is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinControls {
    /// Spin toggle.
    pub enabled: bool,
    /// Selected axis.
    pub axis: SpinAxis,
    /// Speed, at least [`MIN_SPIN_SPEED`].
    pub speed: f32,
}

impl SpinControls {
    fn from_options(controls: &ControlOptions) -> Self {
        Self {
            enabled: controls.spin_enabled,
            axis: controls.spin_axis,
            speed: clamp_speed(controls.spin_speed).unwrap_or(MIN_SPIN_SPEED),
        }
    }
}

fn clamp_speed(speed: f32) -> Option<f32> {
    speed.is_finite().then(|| speed.max(MIN_SPIN_SPEED))
}

#[derive(Debug, Clone)]
struct BoundFile {
    id: FileId,
    name: String,
}

/// Viewer screen state.
pub struct ViewerPanel {
    session: ViewerSession,
    recorder: RecordingController,
    controls: ControlOptions,
    spin: SpinControls,
    mount: MountPoint,
    bound: Option<BoundFile>,
    status: String,
    last_download: Option<PathBuf>,
    notices: Notices,
}

impl ViewerPanel {
    /// Panel rendering through `render` and recording through `capture`.
    #[must_use]
    pub fn new(
        render: Box<dyn RenderBackend>,
        capture: Box<dyn CaptureBackend>,
        artifacts: SharedArtifacts,
        options: &Options,
    ) -> Self {
        Self {
            session: ViewerSession::new(render, options.viewer.clone()),
            recorder: RecordingController::new(
                capture,
                artifacts,
                options.recording.clone(),
            ),
            controls: options.controls.clone(),
            spin: SpinControls::from_options(&options.controls),
            mount: MountPoint::from_options("viewer", &options.viewer),
            bound: None,
            status: String::new(),
            last_download: None,
            notices: Notices::default(),
        }
    }

    /// The viewer session.
    #[must_use]
    pub fn session(&self) -> &ViewerSession {
        &self.session
    }

    /// The recorder.
    #[must_use]
    pub fn recorder(&self) -> &RecordingController {
        &self.recorder
    }

    /// Spin form state.
    #[must_use]
    pub fn spin_controls(&self) -> SpinControls {
        self.spin
    }

    /// Id of the bound file.
    #[must_use]
    pub fn bound_file(&self) -> Option<&FileId> {
        self.bound.as_ref().map(|b| &b.id)
    }

    /// Where the last download was written.
    #[must_use]
    pub fn last_download(&self) -> Option<&PathBuf> {
        self.last_download.as_ref()
    }

    /// Show `record`, or nothing.
    ///
    /// A different file id replaces the surface and discards any recording
    /// of the previous model. The same id only refreshes the title, so a
    /// rename does not reload.
    pub fn bind(&mut self, record: Option<&FileRecord>) {
        let Some(record) = record else {
            self.unbind();
            return;
        };
        if let Some(bound) = &mut self.bound {
            if bound.id == record.id {
                bound.name.clone_from(&record.name);
                return;
            }
        }

        self.recorder.teardown();
        self.session.load(record.as_content(), &self.mount);
        self.apply_spin();
        self.bound = Some(BoundFile {
            id: record.id.clone(),
            name: record.name.clone(),
        });
        self.last_download = None;
        self.status = if self.session.is_loaded() {
            format!("showing {}", record.name)
        } else {
            format!("could not show {}", record.name)
        };
        self.collect_notices();
    }

    /// Leave the viewer: release the surface and any recording.
    pub fn unbind(&mut self) {
        if self.bound.take().is_none() {
            return;
        }
        self.recorder.teardown();
        self.session.unload();
        self.last_download = None;
        self.status.clear();
    }

    /// Apply one user action.
    pub fn dispatch(&mut self, action: PanelAction, now: Instant) {
        match action {
            PanelAction::ToggleSpin => {
                self.spin.enabled = !self.spin.enabled;
                self.apply_spin();
            }
            PanelAction::SetSpinAxis(axis) => {
                self.spin.axis = axis;
                self.apply_spin();
            }
            PanelAction::SetSpinSpeed(speed) => {
                let Some(speed) = clamp_speed(speed) else {
                    log::debug!("ignoring spin speed {speed}");
                    return;
                };
                self.spin.speed = speed;
                self.apply_spin();
            }
            PanelAction::Pan(direction) => {
                let (x, y) = direction.offset();
                let step = self.controls.pan_step;
                self.session.pan(x * step, y * step);
            }
            PanelAction::Rotate(RotateStep { axis, positive }) => {
                let step = self.controls.rotate_step;
                self.session.rotate(if positive { step } else { -step }, axis);
            }
            PanelAction::ZoomIn => self.session.zoom(self.controls.zoom_in_factor),
            PanelAction::ZoomOut => {
                self.session.zoom(self.controls.zoom_out_factor);
            }
            PanelAction::Record => {
                let duration = self.recorder.options().duration();
                let output = self.session.output();
                self.recorder.start(duration, output.as_ref(), now);
                if self.recorder.phase() == RecordingPhase::Recording {
                    self.status =
                        format!("recording {:.0}s", duration.as_secs_f32());
                }
            }
            PanelAction::StopRecording => self.recorder.stop(now),
            PanelAction::ClearRecording => {
                self.recorder.reset();
                self.last_download = None;
            }
            PanelAction::Download { dir } => self.download(&dir),
        }
        self.refresh_recording_status();
        self.collect_notices();
    }

    /// Event-loop turn: animate the surface and drive the recorder.
    pub fn update(&mut self, dt: f32, now: Instant) {
        self.session.update(dt);
        let before = self.recorder.phase();
        self.recorder.tick(now);
        if before != self.recorder.phase() {
            self.refresh_recording_status();
        }
        self.collect_notices();
    }

    /// Current panel snapshot.
    #[must_use]
    pub fn view(&self) -> PanelView {
        let phase = self.recorder.phase();
        let artifact = self.recorder.artifact().cloned();
        let download_name = match (&artifact, &self.bound) {
            (Some(info), Some(bound)) => {
                Some(download_name(&bound.name, &info.mime_type))
            }
            _ => None,
        };
        PanelView {
            title: self.bound.as_ref().map(|b| b.name.clone()),
            loaded: self.session.is_loaded(),
            phase,
            record_label: if phase == RecordingPhase::Recording {
                "Recording..."
            } else {
                "Record"
            },
            can_record: self.session.is_loaded() && phase == RecordingPhase::Idle,
            can_stop: phase == RecordingPhase::Recording,
            can_clear: phase == RecordingPhase::Ready,
            artifact,
            download_name,
            spin_enabled: self.spin.enabled,
            spin_axis: self.spin.axis,
            spin_speed: self.spin.speed,
            status: self.status.clone(),
        }
    }

    /// Remove every pending notice, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.collect_notices();
        self.notices.drain()
    }

    fn apply_spin(&mut self) {
        self.session
            .set_spin(self.spin.enabled, self.spin.axis, self.spin.speed);
    }

    fn download(&mut self, dir: &Path) {
        let Some(bound) = &self.bound else {
            return;
        };
        match self.recorder.save_artifact(dir, &bound.name) {
            Ok(path) => {
                self.status = format!("saved {}", path.display());
                self.last_download = Some(path);
            }
            Err(e) => {
                log::error!("download failed: {e}");
                self.notices.push(Notice::Io(e.to_string()));
            }
        }
    }

    fn refresh_recording_status(&mut self) {
        match self.recorder.artifact() {
            Some(info) if self.last_download.is_none() => {
                self.status = format!(
                    "recording ready ({})",
                    format_file_size(info.size as u64)
                );
            }
            Some(_) => {}
            None if self.recorder.phase() == RecordingPhase::Idle
                && self.status.starts_with("recording") =>
            {
                self.status.clear();
            }
            None => {}
        }
    }

    fn collect_notices(&mut self) {
        for notice in self.session.drain_notices() {
            self.notices.push(notice);
        }
        for notice in self.recorder.drain_notices() {
            self.notices.push(notice);
        }
    }
}
