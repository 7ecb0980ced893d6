//! Per-frame scheduling with an owned cancellation handle.
//!
//! # Responsibility
//! - Keep exactly one outstanding frame request on the host clock while
//!   the loop runs.
//! - Release that request on every teardown path.
//!
//! # Invariants
//! - At most one request is pending at any time.
//! - `stop` and `Drop` cancel the pending request; a stopped loop never
//!   requests again.
//! - A frame callback whose id is not the pending one is ignored.

use log::info;

/// Handle returned by the host clock for one scheduled frame.
pub type FrameRequestId = u64;

/// Host frame clock (e.g. an animation-frame scheduler).
pub trait FrameClock {
    /// Schedules one callback for the next frame.
    fn request_frame(&mut self) -> FrameRequestId;
    /// Cancels a scheduled callback that has not fired yet.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Self-rescheduling frame loop bound to a host clock.
pub struct FrameLoop<C: FrameClock> {
    clock: C,
    pending: Option<FrameRequestId>,
    frames: u64,
    stopped: bool,
}

impl<C: FrameClock> FrameLoop<C> {
    /// Requests the first frame and returns the running loop.
    pub fn start(mut clock: C) -> Self {
        let first = clock.request_frame();
        info!("event=frame_loop_start module=layout status=ok request={first}");
        Self {
            clock,
            pending: Some(first),
            frames: 0,
            stopped: false,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    pub fn pending(&self) -> Option<FrameRequestId> {
        self.pending
    }

    /// Number of frames that ran a tick.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Handles a fired frame: runs `tick` and schedules the next frame.
    ///
    /// Returns `None` (without running `tick`) for stale ids or after stop.
    pub fn on_frame<T>(&mut self, id: FrameRequestId, tick: impl FnOnce() -> T) -> Option<T> {
        if self.stopped || self.pending != Some(id) {
            return None;
        }
        self.pending = None;
        let output = tick();
        self.frames += 1;
        self.pending = Some(self.clock.request_frame());
        Some(output)
    }

    /// Cancels the pending frame and stops rescheduling.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Some(id) = self.pending.take() {
            self.clock.cancel_frame(id);
        }
        info!(
            "event=frame_loop_stop module=layout status=ok frames={}",
            self.frames
        );
    }
}

impl<C: FrameClock> Drop for FrameLoop<C> {
    fn drop(&mut self) {
        self.stop();
    }
}
