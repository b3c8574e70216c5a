//! Time-boxed recording of a surface's output.
//!
//! The controller is an explicit three-phase state machine. Each phase owns
//! exactly the resources valid in it:
//!
//! - `Idle` holds nothing.
//! - `Recording` holds the capture stream, the encoder and the buffered
//!   chunks, plus a deadline at `duration + grace`.
//! - `Ready` holds the artifact's revocable URL.
//!
//! Finalization (Recording → Ready) is one guarded transition reachable from
//! an explicit [`stop`](RecordingController::stop), from the encoder reporting
//! completion, or from the deadline; whichever comes first wins and the rest
//! find the controller no longer recording.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use web_time::{Duration, Instant};

use crate::{
    capture::{
        Artifact, ArtifactUrl, CaptureBackend, CaptureStream, Encoder,
        EncoderEvent, SharedArtifacts,
    },
    error::MolcapError,
    notice::{Notice, Notices},
    options::RecordingOptions,
    surface::SurfaceOutput,
    util::format::download_name,
};

/// Observable phase of a [`RecordingController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingPhase {
    /// Nothing captured, nothing in progress.
    Idle,
    /// A capture is running.
    Recording,
    /// A finished artifact is available.
    Ready,
}

/// Description of the ready artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactInfo {
    /// Revocable reference for playback.
    pub url: ArtifactUrl,
    /// MIME type of the data.
    pub mime_type: String,
    /// Size in bytes.
    pub size: usize,
}

struct ActiveCapture {
    stream: Box<dyn CaptureStream>,
    encoder: Box<dyn Encoder>,
    events: Receiver<EncoderEvent>,
    chunks: Vec<Vec<u8>>,
    mime_type: String,
    started_at: Instant,
    deadline: Instant,
    stop_requested: bool,
}

impl ActiveCapture {
    /// Drain encoder events in arrival order. Returns `true` once the
    /// encoder has finalized.
    fn drain_events(&mut self) -> bool {
        let mut finalized = false;
        loop {
            match self.events.try_recv() {
                Ok(EncoderEvent::Chunk(data)) => {
                    if !data.is_empty() {
                        self.chunks.push(data);
                    }
                }
                Ok(EncoderEvent::Finalized) => finalized = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // A dropped encoder can never report again
                    finalized = true;
                    break;
                }
            }
        }
        finalized
    }

    fn request_stop(&mut self) {
        if !self.stop_requested {
            self.stop_requested = true;
            self.encoder.stop();
        }
    }

    /// Exit action of `Recording`: stop encoding, then every track.
    fn release(&mut self) {
        self.request_stop();
        self.stream.stop_tracks();
    }
}

enum Phase {
    Idle,
    Recording(ActiveCapture),
    Ready(ArtifactInfo),
}

/// Records the output of a live surface into a time-boxed artifact.
///
/// Operations called from a phase that does not permit them are ignored.
/// Failures are queued as [`Notice`]s; nothing is returned to the caller.
/// Dropping the controller stops any capture and revokes any artifact.
pub struct RecordingController {
    backend: Box<dyn CaptureBackend>,
    artifacts: SharedArtifacts,
    options: RecordingOptions,
    phase: Phase,
    notices: Notices,
}

impl RecordingController {
    /// Controller capturing through `backend` and minting artifact
    /// references in `artifacts`.
    #[must_use]
    pub fn new(
        backend: Box<dyn CaptureBackend>,
        artifacts: SharedArtifacts,
        options: RecordingOptions,
    ) -> Self {
        Self {
            backend,
            artifacts,
            options,
            phase: Phase::Idle,
            notices: Notices::default(),
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> RecordingPhase {
        match self.phase {
            Phase::Idle => RecordingPhase::Idle,
            Phase::Recording(_) => RecordingPhase::Recording,
            Phase::Ready(_) => RecordingPhase::Ready,
        }
    }

    /// Recording parameters.
    #[must_use]
    pub fn options(&self) -> &RecordingOptions {
        &self.options
    }

    /// The ready artifact, if any.
    #[must_use]
    pub fn artifact(&self) -> Option<&ArtifactInfo> {
        match &self.phase {
            Phase::Ready(info) => Some(info),
            _ => None,
        }
    }

    /// When the running capture will be forced to finalize.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        match &self.phase {
            Phase::Recording(capture) => Some(capture.deadline),
            _ => None,
        }
    }

    /// Pop the oldest pending notice.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.take()
    }

    /// Remove every pending notice.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Begin capturing `output` for `duration`.
    ///
    /// Only valid from `Idle`. Without a live output, or if the capture
    /// capability fails, a notice is queued and the controller stays idle.
    pub fn start(
        &mut self,
        duration: Duration,
        output: Option<&SurfaceOutput>,
        now: Instant,
    ) {
        if !matches!(self.phase, Phase::Idle) {
            log::debug!("ignoring start while {:?}", self.phase());
            return;
        }
        let Some(output) = output.filter(|o| o.is_live()) else {
            log::warn!("cannot record: no live surface");
            self.notices.push(Notice::NoActiveSurface);
            return;
        };
        let Some(deadline) = now
            .checked_add(duration)
            .and_then(|t| t.checked_add(self.options.grace()))
        else {
            log::warn!("cannot record: clip length {duration:?} is out of range");
            self.notices.push(Notice::ClipLengthOutOfRange);
            return;
        };

        let mut stream = match self
            .backend
            .capture_stream(output, self.options.frame_rate)
        {
            Ok(stream) => stream,
            Err(e) => {
                log::error!("failed to open capture stream: {e}");
                self.notices.push(Notice::EnvironmentUnavailable(e.to_string()));
                return;
            }
        };

        let (tx, rx) = mpsc::channel();
        let encoder_options = self.options.encoder_options();
        let mut encoder = match self.backend.create_encoder(&encoder_options, tx)
        {
            Ok(encoder) => encoder,
            Err(e) => {
                log::error!("failed to create encoder: {e}");
                stream.stop_tracks();
                self.notices.push(Notice::EnvironmentUnavailable(e.to_string()));
                return;
            }
        };

        encoder.start(now);
        log::info!(
            "recording {:.1}s at {} fps ({})",
            duration.as_secs_f32(),
            self.options.frame_rate,
            encoder.mime_type()
        );
        self.phase = Phase::Recording(ActiveCapture {
            mime_type: encoder.mime_type().to_owned(),
            stream,
            encoder,
            events: rx,
            chunks: Vec::new(),
            started_at: now,
            deadline,
            stop_requested: false,
        });
    }

    /// Finish the running capture now instead of waiting for the deadline.
    ///
    /// Finalizes as soon as the encoder reports completion, which for a
    /// synchronous encoder is before this returns.
    pub fn stop(&mut self, now: Instant) {
        if !matches!(self.phase, Phase::Recording(_)) {
            log::debug!("ignoring stop while {:?}", self.phase());
            return;
        }
        if let Phase::Recording(capture) = &mut self.phase {
            capture.request_stop();
        }
        self.pump(now);
    }

    /// Event-loop turn: feed the encoder, collect its chunks, and fire the
    /// deadline.
    pub fn tick(&mut self, now: Instant) {
        self.pump(now);
    }

    /// Discard the ready artifact and return to `Idle`.
    pub fn reset(&mut self) {
        if !matches!(self.phase, Phase::Ready(_)) {
            log::debug!("ignoring reset while {:?}", self.phase());
            return;
        }
        self.teardown();
    }

    /// Release everything from any phase and return to `Idle`.
    ///
    /// Used when the recorded model goes away. A running capture is
    /// abandoned without producing an artifact.
    pub fn teardown(&mut self) {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::Recording(mut capture) => {
                log::info!("abandoning recording");
                capture.release();
            }
            Phase::Ready(info) => {
                let _ = self.artifacts.borrow_mut().revoke(&info.url);
            }
        }
    }

    /// Write the ready artifact into `dir`, named after `source_name`.
    pub fn save_artifact(
        &self,
        dir: &Path,
        source_name: &str,
    ) -> Result<PathBuf, MolcapError> {
        let info = self.artifact().ok_or_else(|| {
            MolcapError::InvalidInput("no recording to download".into())
        })?;
        let artifact =
            self.artifacts.borrow().resolve(&info.url).ok_or_else(|| {
                MolcapError::InvalidInput(format!("{} was revoked", info.url))
            })?;
        let path = dir.join(download_name(source_name, &artifact.mime_type));
        std::fs::write(&path, &artifact.data)?;
        log::info!("saved {} bytes to {}", artifact.data.len(), path.display());
        Ok(path)
    }

    fn pump(&mut self, now: Instant) {
        let Phase::Recording(capture) = &mut self.phase else {
            return;
        };
        if !capture.stop_requested {
            capture.encoder.pump(capture.stream.as_mut(), now);
        }
        let mut finalized = capture.drain_events();

        let deadline_fired = now >= capture.deadline;
        if deadline_fired && !capture.stop_requested {
            log::debug!("recording deadline reached");
            capture.request_stop();
            finalized |= capture.drain_events();
        }

        if finalized || deadline_fired {
            self.finalize(now);
        }
    }

    /// Recording → Ready (or → Idle with an empty artifact). At most once
    /// per capture: it only acts while recording.
    fn finalize(&mut self, now: Instant) {
        if !matches!(self.phase, Phase::Recording(_)) {
            return;
        }
        let Phase::Recording(mut capture) =
            std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return;
        };
        capture.release();
        let _ = capture.drain_events();

        let elapsed = now.saturating_duration_since(capture.started_at);
        if capture.chunks.is_empty() {
            log::warn!(
                "recording produced no data after {:.1}s",
                elapsed.as_secs_f32()
            );
            self.notices.push(Notice::EmptyArtifact);
            return;
        }

        let data = capture.chunks.concat();
        let size = data.len();
        let url = self.artifacts.borrow_mut().mint(Artifact {
            mime_type: capture.mime_type.clone(),
            data,
        });
        log::info!(
            "recording ready: {size} bytes in {} chunks after {:.1}s ({url})",
            capture.chunks.len(),
            elapsed.as_secs_f32()
        );
        self.phase = Phase::Ready(ArtifactInfo {
            url,
            mime_type: capture.mime_type,
            size,
        });
    }
}

impl Drop for RecordingController {
    fn drop(&mut self) {
        self.teardown();
    }
}
