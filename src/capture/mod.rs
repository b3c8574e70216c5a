//! The capture/encode capability the recorder drives.
//!
//! A [`CaptureBackend`] opens a [`CaptureStream`] on a surface output and
//! creates an [`Encoder`]. Encoders report back through a channel of
//! [`EncoderEvent`]s which the recorder drains on its own schedule, so
//! completion is delivered the same way whether the encoder works
//! synchronously or in the background.

/// Revocable references to finished recordings.
pub mod artifact;
/// Capture implementation that packs frame snapshots into chunks.
pub mod headless;

use std::sync::mpsc::Sender;

use web_time::{Duration, Instant};

pub use self::artifact::{Artifact, ArtifactRegistry, ArtifactUrl, SharedArtifacts};
use crate::{error::MolcapError, surface::SurfaceOutput};

/// One frame read from a capture stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Render pass index of the source frame.
    pub index: u64,
    /// Raw frame payload.
    pub data: Vec<u8>,
}

/// Live feed of a surface's output.
pub trait CaptureStream {
    /// Read the next frame if one is due at `now`.
    fn read_frame(&mut self, now: Instant) -> Option<CapturedFrame>;

    /// Stop and release every track.
    fn stop_tracks(&mut self);

    /// Number of tracks still running.
    fn live_tracks(&self) -> usize;
}

/// Encoder parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Requested container/codec.
    pub mime_type: String,
    /// Requested bit rate.
    pub bits_per_second: u32,
    /// How often buffered data is handed over as a chunk.
    pub timeslice: Duration,
}

/// Notification from an encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    /// A piece of encoded data. May be empty.
    Chunk(Vec<u8>),
    /// The encoder has flushed everything and stopped.
    Finalized,
}

/// Turns a capture stream into encoded chunks.
pub trait Encoder {
    /// Begin encoding.
    fn start(&mut self, now: Instant);

    /// Stop encoding and flush. Completion is reported with
    /// [`EncoderEvent::Finalized`], possibly later.
    fn stop(&mut self);

    /// Give the encoder a turn to pull frames from `stream`.
    fn pump(&mut self, stream: &mut dyn CaptureStream, now: Instant);

    /// MIME type of the produced data.
    fn mime_type(&self) -> &str;
}

/// Opens capture streams and encoders.
pub trait CaptureBackend {
    /// Open a stream on `output` sampling at `frame_rate` frames per second.
    fn capture_stream(
        &mut self,
        output: &SurfaceOutput,
        frame_rate: u32,
    ) -> Result<Box<dyn CaptureStream>, MolcapError>;

    /// Create an encoder that reports on `events`.
    fn create_encoder(
        &mut self,
        options: &EncoderOptions,
        events: Sender<EncoderEvent>,
    ) -> Result<Box<dyn Encoder>, MolcapError>;
}
