//! Per-frame orchestration: sample, map, upload, draw, present.

use std::time::Instant;

use glam::Vec3;

use crate::coords::{map_to_ndc, Viewport};
use crate::rendering::{BufferError, DrawCall};
use crate::wave::WaveField;

/// Frame counter interval between progress log lines
const PROGRESS_LOG_INTERVAL: u64 = 600;

/// The window-side collaborator a [`FrameDriver`] renders into
pub trait FrameTarget {
    /// Current drawable size, re-read every frame
    fn viewport(&self) -> Viewport;

    /// Replace the GPU vertex contents with `vertices` (3 floats each)
    fn upload(&mut self, vertices: &[f32]) -> Result<(), BufferError>;

    /// Bind the shader program, issue `draw` and present the frame
    fn render(&mut self, draw: DrawCall);

    /// Release the shader program and any other per-window resources
    fn release(&mut self);
}

/// Lifecycle of the render loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Running,
    Terminating,
    Cleanup,
    Finished,
}

/// Elapsed time since a fixed epoch
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    epoch: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn elapsed_s(&self) -> f32 {
        self.epoch.elapsed().as_secs_f32()
    }
}

/// Render loop state machine driving one [`WaveField`]
pub struct FrameDriver {
    field: WaveField,
    clock: FrameClock,
    state: FrameState,
    close_requested: bool,
    /// World-space samples, reused across frames
    samples: Vec<Vec3>,
    /// Interleaved NDC positions handed to the target each frame
    batch: Vec<f32>,
    frames: u64,
}

impl FrameDriver {
    pub fn new(field: WaveField) -> Self {
        Self::with_clock(field, FrameClock::start())
    }

    pub fn with_clock(field: WaveField, clock: FrameClock) -> Self {
        let vertex_count = field.vertex_count();
        Self {
            field,
            clock,
            state: FrameState::Running,
            close_requested: false,
            samples: Vec::with_capacity(vertex_count),
            batch: Vec::with_capacity(vertex_count * 3),
            frames: 0,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Record the window-close signal; honoured at the top of the next frame
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Run one iteration at the clock's current time
    pub fn frame<T: FrameTarget>(&mut self, target: &mut T) -> FrameState {
        if self.check_close(target) {
            return self.state;
        }
        let elapsed_s = self.clock.elapsed_s();
        self.run_frame(elapsed_s, target);
        self.state
    }

    /// Run one iteration at an explicit time
    pub fn frame_at<T: FrameTarget>(&mut self, elapsed_s: f32, target: &mut T) -> FrameState {
        if self.check_close(target) {
            return self.state;
        }
        self.run_frame(elapsed_s, target);
        self.state
    }

    /// Release resources if the loop ends without observing a close signal
    pub fn shutdown<T: FrameTarget>(&mut self, target: &mut T) {
        self.close_requested = true;
        self.check_close(target);
    }

    /// Loop-top check; returns true when no frame should run
    fn check_close<T: FrameTarget>(&mut self, target: &mut T) -> bool {
        match self.state {
            FrameState::Running if self.close_requested => {
                self.state = FrameState::Terminating;
                log::info!("Close requested after {} frames", self.frames);

                self.state = FrameState::Cleanup;
                target.release();

                self.state = FrameState::Finished;
                true
            }
            FrameState::Running => false,
            _ => true,
        }
    }

    fn run_frame<T: FrameTarget>(&mut self, elapsed_s: f32, target: &mut T) {
        let viewport = target.viewport();
        if viewport.is_empty() {
            log::trace!("Skipping frame {}: viewport has no area", self.frames);
            return;
        }

        self.field.sample_into(elapsed_s, &mut self.samples);
        self.batch.clear();
        for &position in &self.samples {
            let ndc = map_to_ndc(position, viewport);
            self.batch.extend_from_slice(&ndc.to_array());
        }

        if let Err(e) = target.upload(&self.batch) {
            log::warn!("Skipping frame {}: {}", self.frames, e);
            return;
        }

        let draw = DrawCall::for_topology(self.field.topology(), self.samples.len());
        target.render(draw);

        self.frames += 1;
        log::trace!("Frame {} at {:.3}s", self.frames, elapsed_s);
        if self.frames % PROGRESS_LOG_INTERVAL == 0 {
            log::debug!("{} frames rendered ({:.1}s)", self.frames, elapsed_s);
        }
    }
}
