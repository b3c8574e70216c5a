// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Molecular structure viewer sessions with camera control and clip
//! recording.
//!
//! molcap keeps an imperative rendering surface and a capture pipeline in
//! step with declarative UI state: a file is bound, a surface is created for
//! it, camera commands flow to the surface, and a short clip of the live
//! output can be recorded into a downloadable artifact.
//!
//! # Key entry points
//!
//! - [`session::ViewerSession`] - owns the surface of one loaded model
//! - [`recording::RecordingController`] - the `Idle → Recording → Ready`
//!   capture state machine
//! - [`panel::ViewerPanel`] - binds a file to both and maps user actions
//! - [`app::App`] - upload, history and viewer screens wired together
//! - [`options::Options`] - runtime configuration (viewer, controls,
//!   recording)
//!
//! # Architecture
//!
//! Everything runs on the caller's thread. The host loop passes the clock in
//! (`update(dt, now)`), which drives the spin animation, feeds the encoder
//! and fires the recording deadline. Rendering and capture sit behind the
//! [`surface::RenderBackend`] and [`capture::CaptureBackend`] traits; the
//! headless implementations in [`surface::headless`] and
//! [`capture::headless`] keep a real camera and emit real frame data without
//! a GPU.

pub mod app;
pub mod capture;
pub mod error;
pub mod history;
pub mod ingest;
pub mod model;
pub mod navigation;
pub mod notice;
pub mod options;
pub mod panel;
pub mod recording;
pub mod session;
pub mod surface;
pub mod util;

#[cfg(test)]
mod testing;
