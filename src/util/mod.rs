//! Shared helpers.

/// Frame pacing and FPS measurement.
pub mod frame_timing;
/// Human-readable sizes and download names.
pub mod format;
