//! Plexus Particles - drifting particle field with a proximity graph
//!
//! Provides the per-tick simulation behind the animated background:
//! - Density-sized population, reseeded from scratch on every resize
//! - Reflecting motion inside the surface bounds
//! - Sinusoidal size/opacity pulse per particle
//! - Halo + core drawing, colors resolved against the active palette
//! - Connection lines between nearby particles (`connections`)

pub mod connections;
pub mod field;
pub mod grid;
pub mod particle;
pub mod rand;

use plexus_core::{Canvas, FieldConfig, Palette};

pub use connections::{ConnectionRenderer, Edge, EdgeStyle, ProximityStrategy};
pub use field::{target_count, ParticleField};
pub use particle::{Bounce, ColorRef, Particle};

/// Owns the current particle field and evolves it one tick at a time.
pub struct ParticleSystem {
    config: FieldConfig,
    field: ParticleField,
    rng: rand::ParticleRng,
    color: ColorRef,
}

impl ParticleSystem {
    pub fn new(config: FieldConfig) -> Self {
        Self::with_rng(config, rand::ParticleRng::from_entropy())
    }

    /// Use a specific generator (tests pin the seed through this)
    pub fn with_rng(config: FieldConfig, rng: rand::ParticleRng) -> Self {
        Self {
            config,
            field: ParticleField::default(),
            rng,
            color: ColorRef::Active,
        }
    }

    /// Color source given to particles created by the next `seed`
    pub fn set_color_ref(&mut self, color: ColorRef) {
        self.color = color;
    }

    /// Discard the current field and generate a new one for the given bounds
    pub fn seed(&mut self, width: f32, height: f32) {
        self.field =
            ParticleField::generate(width, height, &self.config, self.color, &mut self.rng);
        log::debug!(
            "seeded {} particles for {}x{}",
            self.field.len(),
            width,
            height
        );
    }

    /// Advance every particle by one tick
    pub fn update(&mut self) {
        let (width, height) = self.field.bounds();
        for particle in self.field.particles_mut() {
            particle.step(width, height);
        }
    }

    /// Paint each particle's halo followed by its solid core
    pub fn draw(&self, canvas: &mut dyn Canvas, palette: &Palette) {
        let size_amp = self.config.size_pulse_amplitude;
        let opacity_amp = self.config.opacity_pulse_amplitude;
        for particle in self.field.particles() {
            let color = particle.color.resolve(palette);
            let size = particle.current_size(size_amp);
            let opacity = particle.current_opacity(opacity_amp);
            canvas.fill_halo(
                particle.position,
                size * self.config.halo_radius_multiplier,
                color,
                opacity,
            );
            canvas.fill_circle(particle.position, size, color, opacity);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        self.field.particles()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn len(&self) -> usize {
        self.field.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexus_core::{Color, Vec2};
    use plexus_render::{DrawCommand, RecordingCanvas};
    use proptest::prelude::*;

    fn seeded(width: f32, height: f32, seed: u32) -> ParticleSystem {
        let mut system = ParticleSystem::with_rng(FieldConfig::default(), rand::ParticleRng::new(seed));
        system.seed(width, height);
        system
    }

    #[test]
    fn reseed_replaces_the_whole_field() {
        let mut system = seeded(800.0, 600.0, 5);
        assert_eq!(system.len(), 32);
        let before: Vec<Vec2> = system.particles().iter().map(|p| p.position).collect();

        system.seed(1920.0, 1080.0);
        assert_eq!(system.len(), 120);
        assert_eq!(system.field().bounds(), (1920.0, 1080.0));
        let after: Vec<Vec2> = system.particles().iter().map(|p| p.position).collect();
        assert_ne!(before, after[..32].to_vec());
    }

    #[test]
    fn draw_emits_halo_then_core_per_particle() {
        let system = seeded(400.0, 400.0, 9);
        let mut canvas = RecordingCanvas::new();
        system.draw(&mut canvas, &Palette::DARK);

        let commands = canvas.commands();
        assert_eq!(commands.len(), system.len() * 2);
        for (pair, particle) in commands.chunks(2).zip(system.particles()) {
            match pair {
                [DrawCommand::Halo {
                    center: hc,
                    radius: hr,
                    color,
                    ..
                }, DrawCommand::Circle {
                    center: cc,
                    radius: cr,
                    opacity,
                    ..
                }] => {
                    assert_eq!(*hc, particle.position);
                    assert_eq!(*cc, particle.position);
                    assert!((hr - 2.0 * cr).abs() < 1e-5);
                    assert_eq!(*color, Palette::DARK.particle);
                    assert!((0.0..=1.0).contains(opacity));
                }
                other => panic!("unexpected draw pair {other:?}"),
            }
        }
    }

    #[test]
    fn draw_does_not_move_particles() {
        let system = seeded(640.0, 480.0, 11);
        let before = system.particles().to_vec();
        system.draw(&mut RecordingCanvas::new(), &Palette::LIGHT);
        assert_eq!(before, system.particles());
    }

    #[test]
    fn fixed_colors_ignore_palette() {
        let mut system = ParticleSystem::with_rng(FieldConfig::default(), rand::ParticleRng::new(3));
        let baked = Color::new(0.5, 0.25, 1.0);
        system.set_color_ref(ColorRef::Fixed(baked));
        system.seed(500.0, 500.0);

        let mut canvas = RecordingCanvas::new();
        system.draw(&mut canvas, &Palette::LIGHT);
        assert!(canvas.commands().iter().all(|c| match c {
            DrawCommand::Halo { color, .. } | DrawCommand::Circle { color, .. } => *color == baked,
            _ => false,
        }));
    }

    proptest! {
        #[test]
        fn particles_never_escape(
            seed in 1u32..u32::MAX,
            width in 150.0f32..1200.0,
            height in 150.0f32..900.0,
            ticks in 1usize..400,
        ) {
            let mut system = seeded(width, height, seed);
            for _ in 0..ticks {
                system.update();
                for p in system.particles() {
                    prop_assert!(p.position.x >= 0.0 && p.position.x <= width);
                    prop_assert!(p.position.y >= 0.0 && p.position.y <= height);
                }
            }
        }

        #[test]
        fn speed_is_preserved_across_bounces(seed in 1u32..u32::MAX, ticks in 1usize..300) {
            let mut system = seeded(300.0, 200.0, seed);
            let speeds: Vec<Vec2> = system.particles().iter().map(|p| p.velocity.abs()).collect();
            for _ in 0..ticks {
                system.update();
            }
            for (p, speed) in system.particles().iter().zip(&speeds) {
                prop_assert_eq!(p.velocity.abs(), *speed);
            }
        }
    }
}
