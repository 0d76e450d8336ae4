//! Idle/Running frame loop bound to the host's frame callback

use crate::clock::FrameClock;
use crate::host::{FrameHandle, FrameHost};
use plexus_core::{PlexusError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// The work done on every accepted frame, called in declaration order.
pub trait TickHandler {
    /// Wipe the full surface
    fn clear(&mut self);

    /// Advance the simulation one step
    fn update(&mut self);

    /// Paint the particles at their post-update positions
    fn draw_particles(&mut self);

    /// Compute and paint the proximity graph
    fn draw_connections(&mut self);
}

/// Owns the single outstanding frame request while running.
///
/// A frame callback only runs a tick when its handle matches the pending
/// one, so a callback that was already in flight when `stop` ran is
/// dropped instead of drawing.
pub struct AnimationScheduler {
    state: SchedulerState,
    pending: Option<FrameHandle>,
    generation: u64,
    ticks: u64,
    clock: FrameClock,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            pending: None,
            generation: 0,
            ticks: 0,
            clock: FrameClock::new(),
        }
    }

    /// Idle -> Running. Clears the surface and requests the first frame.
    ///
    /// Returns `Ok(false)` if already running. If the host cannot schedule
    /// a frame the scheduler stays Idle and `HostUnavailable` is returned.
    pub fn start<H>(&mut self, host: &mut H, handler: &mut dyn TickHandler) -> Result<bool>
    where
        H: FrameHost + ?Sized,
    {
        if self.state == SchedulerState::Running {
            return Ok(false);
        }

        let handle = host.request_frame().ok_or_else(|| {
            PlexusError::HostUnavailable("frame scheduling is not available".into())
        })?;

        handler.clear();
        self.pending = Some(handle);
        self.state = SchedulerState::Running;
        self.generation += 1;
        self.clock.reset();
        log::debug!("[scheduler] started, generation {}", self.generation);
        Ok(true)
    }

    /// Host frame callback. Runs one tick when `handle` is the pending
    /// request; stale handles are ignored. Returns whether a tick ran.
    pub fn on_frame<H>(
        &mut self,
        handle: FrameHandle,
        host: &mut H,
        handler: &mut dyn TickHandler,
    ) -> bool
    where
        H: FrameHost + ?Sized,
    {
        if self.state != SchedulerState::Running || self.pending != Some(handle) {
            log::trace!("[scheduler] ignoring stale frame {}", handle.id());
            return false;
        }
        self.pending = None;

        handler.clear();
        handler.update();
        handler.draw_particles();
        handler.draw_connections();
        self.ticks += 1;
        match host.frame_interval() {
            Some(interval) => self.clock.advance(interval),
            None => self.clock.tick(),
        }

        match host.request_frame() {
            Some(next) => self.pending = Some(next),
            None => {
                log::warn!("[scheduler] host stopped granting frames, animation halted");
                self.state = SchedulerState::Idle;
            }
        }
        true
    }

    /// Running -> Idle, cancelling the pending request. Returns whether the
    /// scheduler was running; a no-op when Idle.
    pub fn stop<H>(&mut self, host: &mut H) -> bool
    where
        H: FrameHost + ?Sized,
    {
        if self.state == SchedulerState::Idle {
            return false;
        }
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
        self.state = SchedulerState::Idle;
        log::debug!("[scheduler] stopped after {} ticks", self.ticks);
        true
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Incremented on every successful start
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticks run over the scheduler's lifetime
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ManualHost, MANUAL_FRAME_INTERVAL};

    #[derive(Default)]
    struct Log(Vec<&'static str>);

    impl TickHandler for Log {
        fn clear(&mut self) {
            self.0.push("clear");
        }
        fn update(&mut self) {
            self.0.push("update");
        }
        fn draw_particles(&mut self) {
            self.0.push("particles");
        }
        fn draw_connections(&mut self) {
            self.0.push("connections");
        }
    }

    #[test]
    fn start_clears_and_requests_one_frame() {
        let mut host = ManualHost::new();
        let mut log = Log::default();
        let mut scheduler = AnimationScheduler::new();

        assert!(scheduler.start(&mut host, &mut log).unwrap());
        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert_eq!(log.0, ["clear"]);
        assert_eq!(host.pending_frames(), 1);
        assert_eq!(scheduler.generation(), 1);
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let mut host = ManualHost::new();
        let mut log = Log::default();
        let mut scheduler = AnimationScheduler::new();
        scheduler.start(&mut host, &mut log).unwrap();

        assert!(!scheduler.start(&mut host, &mut log).unwrap());
        assert_eq!(host.pending_frames(), 1);
        assert_eq!(log.0.len(), 1);
        assert_eq!(scheduler.generation(), 1);
    }

    #[test]
    fn tick_runs_steps_in_order_and_reschedules() {
        let mut host = ManualHost::new();
        let mut log = Log::default();
        let mut scheduler = AnimationScheduler::new();
        scheduler.start(&mut host, &mut log).unwrap();
        log.0.clear();

        let handle = host.next_frame().unwrap();
        assert!(scheduler.on_frame(handle, &mut host, &mut log));
        assert_eq!(log.0, ["clear", "update", "particles", "connections"]);
        assert_eq!(host.pending_frames(), 1);
        assert_eq!(scheduler.pending(), host.next_frame());
        assert_eq!(scheduler.ticks(), 1);
        assert_eq!(scheduler.clock().frame_count, 1);
    }

    #[test]
    fn headless_ticks_advance_by_the_host_interval() {
        let mut host = ManualHost::new();
        let mut log = Log::default();
        let mut scheduler = AnimationScheduler::new();
        scheduler.start(&mut host, &mut log).unwrap();

        for _ in 0..3 {
            let handle = host.next_frame().unwrap();
            assert!(scheduler.on_frame(handle, &mut host, &mut log));
        }
        let clock = scheduler.clock();
        assert!((clock.delta_time - MANUAL_FRAME_INTERVAL).abs() < 1e-12);
        assert!((clock.total_time - 3.0 * MANUAL_FRAME_INTERVAL).abs() < 1e-9);
        assert!((clock.fps() - 60.0).abs() < 1e-6);
    }

    #[test]
    fn stop_cancels_pending_and_blocks_late_callbacks() {
        let mut host = ManualHost::new();
        let mut log = Log::default();
        let mut scheduler = AnimationScheduler::new();
        scheduler.start(&mut host, &mut log).unwrap();
        let handle = scheduler.pending().unwrap();

        assert!(scheduler.stop(&mut host));
        assert_eq!(host.cancelled(), &[handle]);
        assert_eq!(host.pending_frames(), 0);

        // A callback already dispatched by the host arrives after stop
        log.0.clear();
        assert!(!scheduler.on_frame(handle, &mut host, &mut log));
        assert!(log.0.is_empty());
    }

    #[test]
    fn stop_while_idle_is_a_no_op() {
        let mut host = ManualHost::new();
        let mut scheduler = AnimationScheduler::new();
        assert!(!scheduler.stop(&mut host));
        assert!(!scheduler.stop(&mut host));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(host.cancelled().is_empty());
    }

    #[test]
    fn mismatched_handle_is_ignored() {
        let mut host = ManualHost::new();
        let mut log = Log::default();
        let mut scheduler = AnimationScheduler::new();
        scheduler.start(&mut host, &mut log).unwrap();
        log.0.clear();

        assert!(!scheduler.on_frame(FrameHandle::new(4242), &mut host, &mut log));
        assert!(log.0.is_empty());
        assert_eq!(host.pending_frames(), 1);
    }

    #[test]
    fn unavailable_host_leaves_scheduler_idle() {
        let mut host = ManualHost::without_frames();
        let mut log = Log::default();
        let mut scheduler = AnimationScheduler::new();

        let err = scheduler.start(&mut host, &mut log).unwrap_err();
        assert!(matches!(err, PlexusError::HostUnavailable(_)));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(log.0.is_empty());
    }

    #[test]
    fn host_dropping_frames_mid_run_goes_idle() {
        let mut host = ManualHost::new();
        let mut log = Log::default();
        let mut scheduler = AnimationScheduler::new();
        scheduler.start(&mut host, &mut log).unwrap();

        host.set_frames_available(false);
        let handle = host.next_frame().unwrap();
        assert!(scheduler.on_frame(handle, &mut host, &mut log));
        assert!(!scheduler.is_running());
        assert!(scheduler.pending().is_none());
    }

    #[test]
    fn restart_bumps_generation() {
        let mut host = ManualHost::new();
        let mut log = Log::default();
        let mut scheduler = AnimationScheduler::new();
        for expected in 1..=3 {
            scheduler.start(&mut host, &mut log).unwrap();
            assert_eq!(scheduler.generation(), expected);
            scheduler.stop(&mut host);
        }
        assert_eq!(host.pending_frames(), 0);
    }
}
