//! Particle state and the per-tick motion/pulse step

use plexus_core::{Color, Palette, Vec2};

/// Where a particle gets its color from at draw time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorRef {
    /// The active palette's particle color, looked up on every draw
    Active,
    /// A color baked in when the particle was created
    Fixed(Color),
}

impl ColorRef {
    pub fn resolve(&self, palette: &Palette) -> Color {
        match self {
            ColorRef::Active => palette.particle,
            ColorRef::Fixed(color) => *color,
        }
    }
}

/// Which axes reflected off a boundary during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    pub x: bool,
    pub y: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub base_size: f32,
    pub base_opacity: f32,
    /// Radians; grows without bound, only its sine is used
    pub pulse_phase: f32,
    pub pulse_speed: f32,
    pub color: ColorRef,
}

impl Particle {
    /// Move by one velocity step, reflecting off the `[0, width] x [0, height]`
    /// bounds, then advance the pulse.
    pub fn step(&mut self, width: f32, height: f32) -> Bounce {
        self.position += self.velocity;
        let bounce = Bounce {
            x: reflect_axis(&mut self.position.x, &mut self.velocity.x, width),
            y: reflect_axis(&mut self.position.y, &mut self.velocity.y, height),
        };
        self.pulse_phase += self.pulse_speed;
        bounce
    }

    /// Pulsed radius, never negative
    pub fn current_size(&self, amplitude: f32) -> f32 {
        (self.base_size + amplitude * self.pulse_phase.sin()).max(0.0)
    }

    /// Pulsed opacity clamped to [0, 1]
    pub fn current_opacity(&self, amplitude: f32) -> f32 {
        (self.base_opacity + amplitude * self.pulse_phase.sin()).clamp(0.0, 1.0)
    }
}

/// Mirror `pos` back inside `[0, max]` and flip `vel` if it crossed an edge.
fn reflect_axis(pos: &mut f32, vel: &mut f32, max: f32) -> bool {
    if *pos < 0.0 {
        *pos = -*pos;
    } else if *pos > max {
        *pos = 2.0 * max - *pos;
    } else {
        return false;
    }
    *vel = -*vel;
    // Bounds narrower than a single step can overshoot the opposite edge
    *pos = pos.clamp(0.0, max);
    true
}
