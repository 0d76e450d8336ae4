//! Plexus Runtime - frame loop and lifecycle
//!
//! - `FrameHost` / `ResizeSource` - host primitive seams, `ManualHost` for headless use
//! - `AnimationScheduler` - Idle/Running loop over host frame callbacks
//! - `FrameClock` - per-tick delta time and smoothed frame rate
//! - `ParticleBackground` - mount / resize / theme / unmount of one animated surface

mod background;
mod clock;
mod host;
mod scheduler;

pub use background::{BackgroundMode, BackgroundStats, ParticleBackground};
pub use clock::FrameClock;
pub use host::{
    FrameHandle, FrameHost, ManualHost, ResizeSource, ResizeSubscription, CANCELLED_HISTORY,
    MANUAL_FRAME_INTERVAL,
};
pub use scheduler::{AnimationScheduler, SchedulerState, TickHandler};
