use std::cell::RefCell;
use std::rc::Rc;

use glam::Mat4;

use super::Spin;

/// What one render pass drew.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    /// Monotonic render pass counter of the surface.
    pub index: u64,
    /// Combined view-projection matrix.
    pub view_proj: Mat4,
    /// Accumulated zoom level (1.0 after fitting).
    pub zoom: f32,
    /// Spin active when the frame was drawn.
    pub spin: Option<Spin>,
}

#[derive(Debug, Default)]
struct OutputState {
    latest: Option<FrameSnapshot>,
    released: bool,
}

/// Drawable output of one surface, shared with capture streams.
///
/// Cloning shares the same output. The owning surface marks it released when
/// it is dropped, after which capture streams see no more frames.
#[derive(Debug, Clone, Default)]
pub struct SurfaceOutput {
    state: Rc<RefCell<OutputState>>,
}

impl SurfaceOutput {
    /// Create a fresh, live output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest frame.
    pub fn publish(&self, frame: FrameSnapshot) {
        let mut state = self.state.borrow_mut();
        if !state.released {
            state.latest = Some(frame);
        }
    }

    /// The most recently drawn frame.
    #[must_use]
    pub fn latest(&self) -> Option<FrameSnapshot> {
        self.state.borrow().latest
    }

    /// Mark the output dead. Called by the owning surface on drop.
    pub fn release(&self) {
        let mut state = self.state.borrow_mut();
        state.released = true;
        state.latest = None;
    }

    /// Whether the owning surface is still alive.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.state.borrow().released
    }

    /// Whether two handles refer to the same output.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}
