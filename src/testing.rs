//! Mock backends and fixtures shared by unit tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use glam::Mat4;
use web_time::Instant;

use crate::{
    capture::{
        CaptureBackend, CaptureStream, CapturedFrame, Encoder, EncoderEvent,
        EncoderOptions,
    },
    error::MolcapError,
    model::{FileRecord, ModelFormat},
    options::{StyleOptions, ViewerOptions},
    surface::{
        Axis, FrameSnapshot, MountPoint, RenderBackend, Spin, Surface,
        SurfaceOutput,
    },
};

/// Edge length of the cube fixture, in surface units.
pub(crate) const PDB_CUBE_EDGE: f32 = 200.0;

/// PDB text with one atom at each corner of a cube of side `edge`.
pub(crate) fn pdb_fixture(edge: f32) -> String {
    let mut text = String::from("HEADER    TEST CUBE\n");
    let mut serial = 1;
    for x in [0.0, edge] {
        for y in [0.0, edge] {
            for z in [0.0, edge] {
                text.push_str(&format!(
                    "ATOM  {serial:>5}  CA  ALA A{serial:>4}    {x:>8.3}{y:>8.3}{z:>8.3}  1.00 60.00           C\n"
                ));
                serial += 1;
            }
        }
    }
    text.push_str("END\n");
    text
}

/// History record holding the cube fixture.
pub(crate) fn cube_record(name: &str) -> FileRecord {
    let content = pdb_fixture(PDB_CUBE_EDGE);
    let size = content.len() as u64;
    FileRecord::new(name, content, size, ModelFormat::Pdb)
}

/// Live output with one frame already drawn.
pub(crate) fn frame_output() -> SurfaceOutput {
    let output = SurfaceOutput::new();
    output.publish(FrameSnapshot {
        index: 1,
        view_proj: Mat4::IDENTITY,
        zoom: 1.0,
        spin: None,
    });
    output
}

// ── Rendering ────────────────────────────────────────────────────────────

/// A command a mock surface received.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SurfaceCall {
    Load(String),
    Style,
    ZoomTo,
    Render,
    Translate(f32, f32),
    Rotate(f32, Axis),
    Zoom(f32),
    Spin(Option<Spin>),
}

#[derive(Debug, Default)]
struct RenderState {
    unavailable: bool,
    created: usize,
    live: usize,
    calls: Vec<SurfaceCall>,
    zoom: f32,
    spin: Option<Spin>,
}

/// Render backend recording every surface call.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockRender {
    state: Rc<RefCell<RenderState>>,
}

impl MockRender {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.state.borrow_mut().unavailable = unavailable;
    }

    pub(crate) fn created(&self) -> usize {
        self.state.borrow().created
    }

    pub(crate) fn live_surfaces(&self) -> usize {
        self.state.borrow().live
    }

    pub(crate) fn calls(&self) -> Vec<SurfaceCall> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Zoom level of the most recent surface.
    pub(crate) fn zoom(&self) -> f32 {
        self.state.borrow().zoom
    }

    /// Spin of the most recent surface.
    pub(crate) fn spin(&self) -> Option<Spin> {
        self.state.borrow().spin
    }
}

impl RenderBackend for MockRender {
    fn create_surface(
        &mut self,
        mount: &MountPoint,
        _options: &ViewerOptions,
    ) -> Result<Box<dyn Surface>, MolcapError> {
        let mut state = self.state.borrow_mut();
        if state.unavailable {
            return Err(MolcapError::EnvironmentUnavailable(format!(
                "mock has no renderer for {}",
                mount.id
            )));
        }
        state.created += 1;
        state.live += 1;
        state.zoom = 1.0;
        state.spin = None;
        Ok(Box::new(MockSurface {
            state: self.state.clone(),
            output: SurfaceOutput::new(),
            frames: 0,
        }))
    }
}

struct MockSurface {
    state: Rc<RefCell<RenderState>>,
    output: SurfaceOutput,
    frames: u64,
}

impl MockSurface {
    fn record(&self, call: SurfaceCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Drop for MockSurface {
    fn drop(&mut self) {
        self.state.borrow_mut().live -= 1;
        self.output.release();
    }
}

impl Surface for MockSurface {
    fn load_model(
        &mut self,
        text: &str,
        _format: ModelFormat,
    ) -> Result<(), MolcapError> {
        self.record(SurfaceCall::Load(text.to_owned()));
        if text.is_empty() {
            return Err(MolcapError::ModelLoad("empty".into()));
        }
        Ok(())
    }

    fn set_style(&mut self, _style: &StyleOptions) {
        self.record(SurfaceCall::Style);
    }

    fn zoom_to(&mut self) {
        self.record(SurfaceCall::ZoomTo);
    }

    fn render(&mut self) {
        self.record(SurfaceCall::Render);
        self.frames += 1;
        let (zoom, spin) = {
            let state = self.state.borrow();
            (state.zoom, state.spin)
        };
        self.output.publish(FrameSnapshot {
            index: self.frames,
            view_proj: Mat4::IDENTITY,
            zoom,
            spin,
        });
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.record(SurfaceCall::Translate(dx, dy));
    }

    fn rotate(&mut self, angle_deg: f32, axis: Axis) {
        self.record(SurfaceCall::Rotate(angle_deg, axis));
    }

    fn zoom(&mut self, factor: f32) {
        self.record(SurfaceCall::Zoom(factor));
        self.state.borrow_mut().zoom *= factor;
    }

    fn spin(&mut self, spin: Option<Spin>) {
        self.record(SurfaceCall::Spin(spin));
        self.state.borrow_mut().spin = spin;
    }

    fn advance(&mut self, _dt: f32) -> bool {
        self.state.borrow().spin.is_some()
    }

    fn output(&self) -> SurfaceOutput {
        self.output.clone()
    }
}

// ── Capture ──────────────────────────────────────────────────────────────

#[derive(Debug)]
struct CaptureState {
    script: Vec<Vec<u8>>,
    finalize_on_stop: bool,
    encoder_fails: bool,
    streams_opened: usize,
    live_streams: usize,
    encoder_stops: usize,
}

/// Capture backend whose encoder emits a scripted list of chunks, one per
/// pump, and the rest on stop.
#[derive(Debug, Clone)]
pub(crate) struct MockCapture {
    state: Rc<RefCell<CaptureState>>,
}

impl MockCapture {
    pub(crate) fn with_chunks(script: Vec<Vec<u8>>) -> Self {
        Self {
            state: Rc::new(RefCell::new(CaptureState {
                script,
                finalize_on_stop: true,
                encoder_fails: false,
                streams_opened: 0,
                live_streams: 0,
                encoder_stops: 0,
            })),
        }
    }

    /// When false the encoder never reports completion.
    pub(crate) fn set_finalize_on_stop(&self, finalize: bool) {
        self.state.borrow_mut().finalize_on_stop = finalize;
    }

    pub(crate) fn set_encoder_fails(&self, fails: bool) {
        self.state.borrow_mut().encoder_fails = fails;
    }

    pub(crate) fn streams_opened(&self) -> usize {
        self.state.borrow().streams_opened
    }

    pub(crate) fn live_streams(&self) -> usize {
        self.state.borrow().live_streams
    }

    pub(crate) fn encoder_stops(&self) -> usize {
        self.state.borrow().encoder_stops
    }
}

impl CaptureBackend for MockCapture {
    fn capture_stream(
        &mut self,
        output: &SurfaceOutput,
        _frame_rate: u32,
    ) -> Result<Box<dyn CaptureStream>, MolcapError> {
        let mut state = self.state.borrow_mut();
        state.streams_opened += 1;
        state.live_streams += 1;
        Ok(Box::new(MockStream {
            state: self.state.clone(),
            output: output.clone(),
            live: true,
        }))
    }

    fn create_encoder(
        &mut self,
        options: &EncoderOptions,
        events: Sender<EncoderEvent>,
    ) -> Result<Box<dyn Encoder>, MolcapError> {
        if self.state.borrow().encoder_fails {
            return Err(MolcapError::EnvironmentUnavailable(
                "mock encoder refused".into(),
            ));
        }
        Ok(Box::new(MockEncoder {
            state: self.state.clone(),
            events,
            mime_type: options.mime_type.clone(),
            running: false,
        }))
    }
}

struct MockStream {
    state: Rc<RefCell<CaptureState>>,
    output: SurfaceOutput,
    live: bool,
}

impl CaptureStream for MockStream {
    fn read_frame(&mut self, _now: Instant) -> Option<CapturedFrame> {
        if !self.live {
            return None;
        }
        let frame = self.output.latest()?;
        Some(CapturedFrame {
            index: frame.index,
            data: Vec::new(),
        })
    }

    fn stop_tracks(&mut self) {
        if self.live {
            self.live = false;
            self.state.borrow_mut().live_streams -= 1;
        }
    }

    fn live_tracks(&self) -> usize {
        usize::from(self.live)
    }
}

struct MockEncoder {
    state: Rc<RefCell<CaptureState>>,
    events: Sender<EncoderEvent>,
    mime_type: String,
    running: bool,
}

impl Encoder for MockEncoder {
    fn start(&mut self, _now: Instant) {
        self.running = true;
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        let mut state = self.state.borrow_mut();
        state.encoder_stops += 1;
        if state.finalize_on_stop {
            for chunk in state.script.drain(..) {
                let _ = self.events.send(EncoderEvent::Chunk(chunk));
            }
            let _ = self.events.send(EncoderEvent::Finalized);
        }
    }

    fn pump(&mut self, stream: &mut dyn CaptureStream, now: Instant) {
        if !self.running {
            return;
        }
        let _ = stream.read_frame(now);
        let mut state = self.state.borrow_mut();
        if !state.script.is_empty() {
            let chunk = state.script.remove(0);
            let _ = self.events.send(EncoderEvent::Chunk(chunk));
        }
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}
