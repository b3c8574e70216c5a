use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::capture::EncoderOptions;

/// Longest clip the record button asks for.
const MAX_DURATION_SECS: f32 = 60.0;
/// Longest grace margin after a clip.
const MAX_GRACE_SECS: f32 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Recording", inline)]
#[serde(default)]
/// Clip recording parameters.
pub struct RecordingOptions {
    /// Length of a clip started by the record button, in seconds.
    #[schemars(title = "Clip Length", range(min = 1.0, max = 60.0), extend("step" = 1.0))]
    pub duration_secs: f32,
    /// Extra time after the clip length before the capture is forced to
    /// finalize, so the last frame is flushed.
    #[schemars(skip)]
    pub grace_secs: f32,
    /// Capture frame rate.
    #[schemars(title = "Frame Rate", range(min = 1, max = 120))]
    pub frame_rate: u32,
    /// Requested container/codec.
    #[schemars(skip)]
    pub mime_type: String,
    /// Requested encoder bit rate.
    #[schemars(skip)]
    pub bits_per_second: u32,
    /// Interval at which the encoder hands over encoded chunks, in
    /// milliseconds.
    #[schemars(skip)]
    pub timeslice_ms: u64,
}

impl Default for RecordingOptions {
    fn default() -> Self {
        Self {
            duration_secs: 5.0,
            grace_secs: 1.0,
            frame_rate: 60,
            mime_type: "video/webm;codecs=vp9".into(),
            bits_per_second: 5_000_000,
            timeslice_ms: 1000,
        }
    }
}

impl RecordingOptions {
    /// Clip length as a duration. Negative or non-finite values become
    /// zero, and lengths past one minute are capped.
    #[must_use]
    pub fn duration(&self) -> Duration {
        secs(self.duration_secs, MAX_DURATION_SECS)
    }

    /// Grace margin as a duration, capped at ten seconds.
    #[must_use]
    pub fn grace(&self) -> Duration {
        secs(self.grace_secs, MAX_GRACE_SECS)
    }

    /// Encoder settings derived from these options.
    #[must_use]
    pub fn encoder_options(&self) -> EncoderOptions {
        EncoderOptions {
            mime_type: self.mime_type.clone(),
            bits_per_second: self.bits_per_second,
            timeslice: Duration::from_millis(self.timeslice_ms.max(1)),
        }
    }
}

fn secs(value: f32, max: f32) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::try_from_secs_f32(value.min(max)).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}
