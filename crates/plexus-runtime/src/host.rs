//! Host primitives the animation depends on
//!
//! The host owns frame scheduling and resize notification. Both pairs are
//! fallible at acquisition time: a host that returns `None` cannot animate,
//! and the background degrades to a single static paint.

use std::collections::VecDeque;

/// Token for one outstanding frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Token for one resize-notification registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeSubscription(u64);

impl ResizeSubscription {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// The host's `requestFrame` / `cancelFrame` pair
pub trait FrameHost {
    /// Ask for one callback at the next frame opportunity. `None` when the
    /// host cannot schedule frames.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Withdraw a request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Fixed time between delivered frames, in seconds. `None` means frames
    /// follow the wall clock.
    fn frame_interval(&self) -> Option<f64> {
        None
    }
}

/// The host's `subscribeResize` / `unsubscribeResize` pair
pub trait ResizeSource {
    fn subscribe_resize(&mut self) -> Option<ResizeSubscription>;

    fn unsubscribe_resize(&mut self, subscription: ResizeSubscription);
}

/// Nominal frame spacing of `ManualHost`, in seconds
pub const MANUAL_FRAME_INTERVAL: f64 = 1.0 / 60.0;

/// Cancelled handles `ManualHost` remembers; older ones are forgotten
pub const CANCELLED_HISTORY: usize = 64;

/// Headless host driven by hand: frame requests queue up until the owner
/// pops them with [`ManualHost::next_frame`] and delivers them.
#[derive(Debug)]
pub struct ManualHost {
    next_id: u64,
    pending: VecDeque<FrameHandle>,
    cancelled: Vec<FrameHandle>,
    subscriptions: Vec<ResizeSubscription>,
    frames_available: bool,
    resize_available: bool,
    frames_requested: usize,
}

impl Default for ManualHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualHost {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: VecDeque::new(),
            cancelled: Vec::new(),
            subscriptions: Vec::new(),
            frames_available: true,
            resize_available: true,
            frames_requested: 0,
        }
    }

    /// A host whose frame scheduling is missing
    pub fn without_frames() -> Self {
        Self {
            frames_available: false,
            ..Self::new()
        }
    }

    /// A host whose resize notification is missing
    pub fn without_resize() -> Self {
        Self {
            resize_available: false,
            ..Self::new()
        }
    }

    /// Stop (or resume) granting frame requests from now on
    pub fn set_frames_available(&mut self, available: bool) {
        self.frames_available = available;
    }

    /// Oldest outstanding request, removed from the queue
    pub fn next_frame(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    /// Most recent cancellations, oldest first, at most `CANCELLED_HISTORY`
    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    pub fn subscriptions(&self) -> &[ResizeSubscription] {
        &self.subscriptions
    }

    /// Granted requests over the host's lifetime
    pub fn frames_requested(&self) -> usize {
        self.frames_requested
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl FrameHost for ManualHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        if !self.frames_available {
            return None;
        }
        let handle = FrameHandle::new(self.allocate_id());
        self.pending.push_back(handle);
        self.frames_requested += 1;
        Some(handle)
    }

    fn frame_interval(&self) -> Option<f64> {
        Some(MANUAL_FRAME_INTERVAL)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(index) = self.pending.iter().position(|h| *h == handle) {
            self.pending.remove(index);
            if self.cancelled.len() == CANCELLED_HISTORY {
                self.cancelled.remove(0);
            }
            self.cancelled.push(handle);
        }
    }
}

impl ResizeSource for ManualHost {
    fn subscribe_resize(&mut self) -> Option<ResizeSubscription> {
        if !self.resize_available {
            return None;
        }
        let subscription = ResizeSubscription::new(self.allocate_id());
        self.subscriptions.push(subscription);
        Some(subscription)
    }

    fn unsubscribe_resize(&mut self, subscription: ResizeSubscription) {
        self.subscriptions.retain(|s| *s != subscription);
    }
}
