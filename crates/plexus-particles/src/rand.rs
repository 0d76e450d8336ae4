//! Lightweight xorshift32 PRNG for particle generation

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static STREAM: AtomicU32 = AtomicU32::new(0x9E37_79B9);

pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Seed from the wall clock, mixed with a per-process stream counter so
    /// two fields created in the same instant still diverge.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(0);
        let stream = STREAM.fetch_add(0x6D2B_79F5, Ordering::Relaxed);
        Self::new(nanos ^ stream)
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        // 24 high bits keep the result strictly below 1.0 after rounding
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns a float in [-magnitude, magnitude)
    pub fn symmetric(&mut self, magnitude: f32) -> f32 {
        self.range(-magnitude, magnitude)
    }

    /// Returns an angle in [0, 2π)
    pub fn angle(&mut self) -> f32 {
        self.range(0.0, std::f32::consts::TAU)
    }
}
