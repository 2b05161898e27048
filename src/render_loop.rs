//! The render loop: one sampling -> brightness -> glyph pass per tick.
//!
//! The loop is a two-state machine. It starts Idle (no camera attached) and
//! becomes Running once a camera source is handed over; it stays Running
//! until teardown. Each tick is independent: a frame is pulled, converted
//! and published, or the tick is skipped silently when the source has
//! nothing new. The published `AsciiFrame` is the only state carried across
//! ticks, with this loop as its single writer.

use std::sync::{Arc, Mutex};

use crate::ascii::{self, GLYPH_RAMP};
use crate::camera::CameraCapture;
use crate::frame::AsciiFrame;
use crate::sampler::FrameSampler;
use crate::scheduler::CancelToken;

/// Loop lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No camera attached; ticks publish nothing
    Idle,
    /// Camera attached; ticks run the full pipeline
    Running,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new frame was converted and published
    Published,
    /// The camera had no decoded frame ready; tick skipped silently
    Skipped,
    /// No camera attached
    Idle,
}

/// Owns the camera handle, the sampling surface and the published frame.
pub struct RenderLoop {
    state: LoopState,
    camera: Option<CameraCapture>,
    sampler: FrameSampler,
    invert: bool,
    /// Reused across ticks to keep the hot path allocation-free
    sum_buf: Vec<u16>,
    published: Arc<Mutex<AsciiFrame>>,
    cancel: CancelToken,
}

impl RenderLoop {
    /// Create an idle loop targeting a W x H character grid.
    ///
    /// `cancel` is the scheduler's token; teardown fires it so no further
    /// ticks get scheduled. The published frame starts blank at full
    /// dimensions, which is also what readers see permanently if no camera
    /// ever attaches.
    pub fn new(width: u16, height: u16, invert: bool, cancel: CancelToken) -> Self {
        Self {
            state: LoopState::Idle,
            camera: None,
            sampler: FrameSampler::new(width, height),
            invert,
            sum_buf: Vec::new(),
            published: Arc::new(Mutex::new(AsciiFrame::blank(width, height))),
            cancel,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Attach a started camera. Idle -> Running.
    pub fn attach_camera(&mut self, camera: CameraCapture) {
        self.camera = Some(camera);
        self.state = LoopState::Running;
    }

    /// Shared handle to the most recently published frame.
    ///
    /// Readers only ever lock briefly to clone; the loop is the single
    /// writer.
    pub fn published(&self) -> Arc<Mutex<AsciiFrame>> {
        Arc::clone(&self.published)
    }

    /// Clone of the most recently published frame.
    pub fn latest(&self) -> AsciiFrame {
        self.published
            .lock()
            .map(|f| f.clone())
            .unwrap_or_default()
    }

    /// Run one tick of the pipeline.
    ///
    /// Publishing is all-or-nothing: either a complete H x W frame replaces
    /// the previous one, or nothing changes.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(camera) = self.camera.as_ref() else {
            return TickOutcome::Idle;
        };

        let Some(frame) = camera.get_frame() else {
            // InsufficientFrameData: the source has nothing decoded yet
            return TickOutcome::Skipped;
        };

        let pixels = self.sampler.sample(&frame);
        ascii::channel_sum_grid_into(pixels, &mut self.sum_buf);
        let rendered = ascii::render_sums(
            &self.sum_buf,
            pixels.width,
            pixels.height,
            GLYPH_RAMP,
            self.invert,
        );

        if let Ok(mut slot) = self.published.lock() {
            *slot = rendered;
        }
        TickOutcome::Published
    }

    /// Tear the loop down.
    ///
    /// Unconditionally cancels tick scheduling and stops the camera stream.
    /// Safe to call before a camera was ever attached, and more than once.
    pub fn teardown(&mut self) {
        self.cancel.cancel();
        if let Some(mut camera) = self.camera.take() {
            camera.stop();
        }
        self.state = LoopState::Idle;
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.teardown();
    }
}
