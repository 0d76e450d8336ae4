//! The particle population for one surface generation

use crate::particle::{ColorRef, Particle};
use crate::rand::ParticleRng;
use plexus_core::{FieldConfig, Vec2};

/// Population size for a logical surface: `min(cap, floor(w*h / divisor))`.
pub fn target_count(width: f32, height: f32, config: &FieldConfig) -> usize {
    let area = width.max(0.0) as f64 * height.max(0.0) as f64;
    let by_density = (area / config.density_divisor).floor();
    if by_density >= config.particle_cap as f64 {
        config.particle_cap
    } else {
        by_density as usize
    }
}

/// Particles plus the logical bounds they were seeded for
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
}

impl ParticleField {
    /// Generate a fresh population for a `width` x `height` surface.
    pub fn generate(
        width: f32,
        height: f32,
        config: &FieldConfig,
        color: ColorRef,
        rng: &mut ParticleRng,
    ) -> Self {
        let count = target_count(width, height, config);
        let particles = (0..count)
            .map(|_| Particle {
                position: Vec2::new(rng.range(0.0, width), rng.range(0.0, height)),
                velocity: Vec2::new(
                    rng.symmetric(config.velocity_range),
                    rng.symmetric(config.velocity_range),
                ),
                base_size: rng.range(config.size_min, config.size_max),
                base_opacity: rng.range(config.opacity_min, config.opacity_max),
                pulse_phase: rng.angle(),
                pulse_speed: rng.range(config.pulse_speed_min, config.pulse_speed_max),
                color,
            })
            .collect();

        Self {
            particles,
            width,
            height,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_for_800x600_is_32() {
        assert_eq!(target_count(800.0, 600.0, &FieldConfig::default()), 32);
    }

    #[test]
    fn count_for_1920x1080_is_capped() {
        assert_eq!(target_count(1920.0, 1080.0, &FieldConfig::default()), 120);
    }

    #[test]
    fn count_for_tiny_or_empty_surface_is_zero() {
        let config = FieldConfig::default();
        assert_eq!(target_count(0.0, 0.0, &config), 0);
        assert_eq!(target_count(100.0, 149.0, &config), 0);
        assert_eq!(target_count(100.0, 150.0, &config), 1);
    }

    #[test]
    fn generated_particles_respect_ranges() {
        let config = FieldConfig::default();
        let mut rng = ParticleRng::new(1234);
        let field = ParticleField::generate(1024.0, 768.0, &config, ColorRef::Active, &mut rng);

        assert_eq!(field.len(), 52);
        for p in field.particles() {
            assert!((0.0..=1024.0).contains(&p.position.x));
            assert!((0.0..=768.0).contains(&p.position.y));
            assert!(p.velocity.x.abs() <= 1.0 && p.velocity.y.abs() <= 1.0);
            assert!((1.0..3.0).contains(&p.base_size));
            assert!(p.base_opacity > 0.0 && p.base_opacity < 1.0);
            assert!((0.01..0.03).contains(&p.pulse_speed));
            assert_eq!(p.color, ColorRef::Active);
        }
    }
}
