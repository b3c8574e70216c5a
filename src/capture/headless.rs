use std::sync::mpsc::Sender;

use web_time::{Duration, Instant};

use super::{
    CaptureBackend, CaptureStream, CapturedFrame, Encoder, EncoderEvent,
    EncoderOptions,
};
use crate::{
    error::MolcapError, surface::SurfaceOutput, util::frame_timing::FrameTiming,
};

/// MIME type of [`FrameEncoder`] output.
pub const FRAME_MIME_TYPE: &str = "application/x-molcap-frames";

/// Backend whose streams sample frame snapshots and whose encoder packs them
/// as raw little-endian records (frame index + column-major matrix).
#[derive(Debug, Clone)]
pub struct FrameCaptureBackend {
    available: bool,
}

impl Default for FrameCaptureBackend {
    fn default() -> Self {
        Self { available: true }
    }
}

impl FrameCaptureBackend {
    /// A backend that can capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend standing in for a host without capture support.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { available: false }
    }
}

impl CaptureBackend for FrameCaptureBackend {
    fn capture_stream(
        &mut self,
        output: &SurfaceOutput,
        frame_rate: u32,
    ) -> Result<Box<dyn CaptureStream>, MolcapError> {
        if !self.available {
            return Err(MolcapError::EnvironmentUnavailable(
                "stream capture is not supported".into(),
            ));
        }
        if !output.is_live() {
            return Err(MolcapError::EnvironmentUnavailable(
                "surface output has been released".into(),
            ));
        }
        Ok(Box::new(FrameStream::new(output.clone(), frame_rate)))
    }

    fn create_encoder(
        &mut self,
        options: &EncoderOptions,
        events: Sender<EncoderEvent>,
    ) -> Result<Box<dyn Encoder>, MolcapError> {
        if !self.available {
            return Err(MolcapError::EnvironmentUnavailable(
                "encoding is not supported".into(),
            ));
        }
        if options.mime_type != FRAME_MIME_TYPE {
            log::debug!(
                "{} requested; frame encoder produces {FRAME_MIME_TYPE}",
                options.mime_type
            );
        }
        Ok(Box::new(FrameEncoder::new(options.timeslice, events)))
    }
}

/// Single-track stream over a [`SurfaceOutput`], paced to a frame rate.
#[derive(Debug)]
pub struct FrameStream {
    output: SurfaceOutput,
    timing: FrameTiming,
    live: bool,
}

impl FrameStream {
    /// Open a stream on `output`.
    #[must_use]
    pub fn new(output: SurfaceOutput, frame_rate: u32) -> Self {
        Self {
            output,
            timing: FrameTiming::new(frame_rate),
            live: true,
        }
    }
}

impl CaptureStream for FrameStream {
    fn read_frame(&mut self, now: Instant) -> Option<CapturedFrame> {
        if !self.live || !self.timing.is_due(now) {
            return None;
        }
        let frame = self.output.latest()?;
        self.timing.end_frame(now);

        let mut data = Vec::with_capacity(8 + 64);
        data.extend_from_slice(&frame.index.to_le_bytes());
        data.extend_from_slice(bytemuck::cast_slice(
            &frame.view_proj.to_cols_array(),
        ));
        Some(CapturedFrame {
            index: frame.index,
            data,
        })
    }

    fn stop_tracks(&mut self) {
        self.live = false;
    }

    fn live_tracks(&self) -> usize {
        usize::from(self.live)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncoderState {
    Inactive,
    Encoding { last_flush: Instant },
    Stopped,
}

/// Encoder that concatenates frame payloads and hands them over every
/// timeslice. Stopping flushes and finalizes synchronously.
#[derive(Debug)]
pub struct FrameEncoder {
    events: Sender<EncoderEvent>,
    timeslice: Duration,
    buffer: Vec<u8>,
    state: EncoderState,
}

impl FrameEncoder {
    /// Encoder reporting on `events`.
    #[must_use]
    pub fn new(timeslice: Duration, events: Sender<EncoderEvent>) -> Self {
        Self {
            events,
            timeslice,
            buffer: Vec::new(),
            state: EncoderState::Inactive,
        }
    }

    fn emit(&self, event: EncoderEvent) {
        if self.events.send(event).is_err() {
            log::debug!("encoder event dropped: receiver gone");
        }
    }

    fn flush(&mut self) {
        let chunk = std::mem::take(&mut self.buffer);
        self.emit(EncoderEvent::Chunk(chunk));
    }
}

impl Encoder for FrameEncoder {
    fn start(&mut self, now: Instant) {
        if self.state == EncoderState::Inactive {
            self.state = EncoderState::Encoding { last_flush: now };
        }
    }

    fn stop(&mut self) {
        if matches!(self.state, EncoderState::Encoding { .. }) {
            self.flush();
            self.state = EncoderState::Stopped;
            self.emit(EncoderEvent::Finalized);
        }
    }

    fn pump(&mut self, stream: &mut dyn CaptureStream, now: Instant) {
        let EncoderState::Encoding { last_flush } = self.state else {
            return;
        };
        if let Some(frame) = stream.read_frame(now) {
            self.buffer.extend_from_slice(&frame.data);
        }
        if now.saturating_duration_since(last_flush) >= self.timeslice {
            self.flush();
            self.state = EncoderState::Encoding { last_flush: now };
        }
    }

    fn mime_type(&self) -> &str {
        FRAME_MIME_TYPE
    }
}
