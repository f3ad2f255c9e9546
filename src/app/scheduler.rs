//! Frame scheduling
//!
//! The viewport asks its host for "one more frame" while the camera is
//! animating. The host owns the actual frame clock (a window's redraw
//! request, a render loop, a test) and calls back into
//! [`YardViewport::on_frame`](crate::app::controller::YardViewport::on_frame).

/// Host-side frame clock
pub trait FrameScheduler {
    /// Asks for a frame callback; repeated requests before the frame coalesce
    fn request_frame(&mut self);

    /// Drops any outstanding request
    fn cancel_frame(&mut self);

    /// True if a frame has been requested and not yet delivered or cancelled
    fn is_pending(&self) -> bool;
}

/// Scheduler driven by an explicit loop
///
/// `take_frame` consumes the pending request, which is how a headless host
/// (or a test) decides whether to run the next frame.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManualScheduler {
    pending: bool,
    requested: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the pending request, returning whether there was one
    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Total requests seen, including coalesced ones
    pub fn requested_count(&self) -> u64 {
        self.requested
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requested += 1;
    }

    fn cancel_frame(&mut self) {
        self.pending = false;
    }

    fn is_pending(&self) -> bool {
        self.pending
    }
}
