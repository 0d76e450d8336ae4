//! Frame clock driven by accepted animation frames

use std::time::Instant;

/// Longest frame delta counted, in seconds
const MAX_DELTA: f64 = 0.25;

/// Weight of the newest sample in the smoothed frame rate
const FPS_SMOOTHING: f64 = 0.1;

/// Tracks time between ticks and a smoothed frame rate
pub struct FrameClock {
    /// Total elapsed animation time in seconds
    pub total_time: f64,
    /// Time since the previous tick in seconds
    pub delta_time: f64,
    /// Ticks since the clock was created or reset
    pub frame_count: u64,
    fps: f64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            frame_count: 0,
            fps: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by the wall time since the previous tick
    pub fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        if self.first_tick {
            self.first_tick = false;
            self.advance(0.0);
        } else {
            self.advance(elapsed);
        }
    }

    /// Advance by an explicit delta (headless hosts have no wall clock)
    pub fn advance(&mut self, elapsed: f64) {
        // Clamp so a stalled tab or breakpoint does not read as one huge frame
        self.delta_time = elapsed.clamp(0.0, MAX_DELTA);
        self.total_time += self.delta_time;
        self.frame_count += 1;

        if self.delta_time > 0.0 {
            let sample = 1.0 / self.delta_time;
            self.fps = if self.fps == 0.0 {
                sample
            } else {
                self.fps + (sample - self.fps) * FPS_SMOOTHING
            };
        }
    }

    /// Smoothed frames per second, 0 until two ticks have been seen
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Forget history; the next tick counts as the first
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = FrameClock::new();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame_count, 0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick();
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame_count, 1);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(3.0);
        assert_eq!(clock.delta_time, 0.25);
        assert_eq!(clock.total_time, 0.25);
    }

    #[test]
    fn test_fps_converges() {
        let mut clock = FrameClock::new();
        clock.advance(1.0 / 30.0);
        assert!((clock.fps() - 30.0).abs() < 1e-6);
        for _ in 0..200 {
            clock.advance(1.0 / 60.0);
        }
        assert!((clock.fps() - 60.0).abs() < 0.01);
        assert_eq!(clock.frame_count, 201);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.advance(0.1);
        clock.reset();
        assert_eq!(clock.frame_count, 0);
        assert_eq!(clock.total_time, 0.0);
    }
}
