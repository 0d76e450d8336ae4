//! Proximity graph between particles
//!
//! Every unordered pair closer than `max_distance` gets a line whose opacity
//! and width fall off linearly with distance. Up to `grid_threshold`
//! particles the pairs are scanned exhaustively (7140 pairs at the default
//! cap of 120); larger populations go through [`SpatialGrid`].

use crate::grid::SpatialGrid;
use crate::particle::Particle;
use plexus_core::{Canvas, FieldConfig, Palette, Vec2};

/// Line appearance for one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub opacity: f32,
    pub width: f32,
}

/// An edge between particles `a < b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityStrategy {
    AllPairs,
    Grid,
}

#[derive(Debug, Clone)]
pub struct ConnectionRenderer {
    pub max_distance: f32,
    pub opacity_scale: f32,
    pub width_scale: f32,
    pub grid_threshold: usize,
}

impl Default for ConnectionRenderer {
    fn default() -> Self {
        Self::from_config(&FieldConfig::default())
    }
}

impl ConnectionRenderer {
    pub fn from_config(config: &FieldConfig) -> Self {
        Self {
            max_distance: config.max_distance,
            opacity_scale: config.connection_opacity_scale,
            width_scale: config.connection_width_scale,
            grid_threshold: config.grid_threshold,
        }
    }

    /// Style for a pair at `distance`, or `None` when too far apart.
    pub fn edge_style(&self, distance: f32) -> Option<EdgeStyle> {
        if !(distance < self.max_distance) {
            return None;
        }
        let falloff = 1.0 - distance / self.max_distance;
        Some(EdgeStyle {
            opacity: falloff * self.opacity_scale,
            width: falloff * self.width_scale,
        })
    }

    pub fn strategy_for(&self, count: usize) -> ProximityStrategy {
        if count > self.grid_threshold {
            ProximityStrategy::Grid
        } else {
            ProximityStrategy::AllPairs
        }
    }

    /// Visit every edge of the proximity graph over `positions`.
    pub fn for_each_edge<F: FnMut(Edge)>(&self, positions: &[Vec2], mut f: F) {
        let mut visit = |a: usize, b: usize| {
            let distance = positions[a].distance(positions[b]);
            if distance < self.max_distance {
                f(Edge { a, b, distance });
            }
        };

        match self.strategy_for(positions.len()) {
            ProximityStrategy::AllPairs => {
                for a in 0..positions.len() {
                    for b in a + 1..positions.len() {
                        visit(a, b);
                    }
                }
            }
            ProximityStrategy::Grid => {
                SpatialGrid::build(positions, self.max_distance)
                    .for_each_candidate_pair(visit);
            }
        }
    }

    /// The edge set over the particles' current positions
    pub fn compute(&self, particles: &[Particle]) -> Vec<Edge> {
        let positions: Vec<Vec2> = particles.iter().map(|p| p.position).collect();
        let mut edges = Vec::new();
        self.for_each_edge(&positions, |edge| edges.push(edge));
        edges
    }

    /// Draw every edge in the palette's line color. Returns the edge count.
    pub fn compute_and_draw(
        &self,
        canvas: &mut dyn Canvas,
        particles: &[Particle],
        palette: &Palette,
    ) -> usize {
        let positions: Vec<Vec2> = particles.iter().map(|p| p.position).collect();
        let mut drawn = 0;
        self.for_each_edge(&positions, |edge| {
            if let Some(style) = self.edge_style(edge.distance) {
                canvas.stroke_line(
                    positions[edge.a],
                    positions[edge.b],
                    style.width,
                    palette.line,
                    style.opacity,
                );
                drawn += 1;
            }
        });
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ColorRef;
    use plexus_render::{DrawCommand, RecordingCanvas};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn particle(x: f32, y: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            base_size: 1.0,
            base_opacity: 0.5,
            pulse_phase: 0.0,
            pulse_speed: 0.01,
            color: ColorRef::Active,
        }
    }

    #[test]
    fn distance_60_gives_half_strength() {
        let renderer = ConnectionRenderer::default();
        let style = renderer.edge_style(60.0).unwrap();
        assert!((style.opacity - 0.15).abs() < 1e-6);
        assert!((style.width - 0.75).abs() < 1e-6);
    }

    #[test]
    fn limits_at_zero_and_max_distance() {
        let renderer = ConnectionRenderer::default();
        let near = renderer.edge_style(0.0).unwrap();
        assert!((near.opacity - 0.3).abs() < 1e-6);
        assert!((near.width - 1.5).abs() < 1e-6);
        assert!(renderer.edge_style(120.0).is_none());
        assert!(renderer.edge_style(500.0).is_none());
        assert!(renderer.edge_style(f32::NAN).is_none());
    }

    #[test]
    fn pair_at_distance_60_is_drawn_once() {
        let particles = vec![particle(100.0, 100.0), particle(160.0, 100.0)];
        let mut canvas = RecordingCanvas::new();
        let drawn = ConnectionRenderer::default().compute_and_draw(
            &mut canvas,
            &particles,
            &Palette::LIGHT,
        );
        assert_eq!(drawn, 1);
        match canvas.commands() {
            [DrawCommand::Line {
                width,
                opacity,
                color,
                ..
            }] => {
                assert!((width - 0.75).abs() < 1e-6);
                assert!((opacity - 0.15).abs() < 1e-6);
                assert_eq!(*color, Palette::LIGHT.line);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn far_pairs_are_not_connected() {
        let particles = vec![particle(0.0, 0.0), particle(121.0, 0.0), particle(0.0, 300.0)];
        assert!(ConnectionRenderer::default().compute(&particles).is_empty());
    }

    #[test]
    fn strategy_switches_above_threshold() {
        let renderer = ConnectionRenderer::default();
        assert_eq!(renderer.strategy_for(120), ProximityStrategy::AllPairs);
        assert_eq!(renderer.strategy_for(121), ProximityStrategy::Grid);
    }

    fn edge_set(renderer: &ConnectionRenderer, positions: &[Vec2]) -> HashSet<(usize, usize)> {
        let mut set = HashSet::new();
        renderer.for_each_edge(positions, |e| {
            assert!(e.a < e.b, "self-pair or unordered edge {e:?}");
            assert!(set.insert((e.a, e.b)), "edge {e:?} emitted twice");
        });
        set
    }

    proptest! {
        #[test]
        fn grid_matches_all_pairs(
            coords in prop::collection::vec((0.0f32..600.0, 0.0f32..400.0), 0..160),
            max_distance in 10.0f32..150.0,
        ) {
            let positions: Vec<Vec2> = coords.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
            let exhaustive = ConnectionRenderer {
                max_distance,
                grid_threshold: usize::MAX,
                ..ConnectionRenderer::default()
            };
            let gridded = ConnectionRenderer {
                max_distance,
                grid_threshold: 0,
                ..ConnectionRenderer::default()
            };
            prop_assert_eq!(edge_set(&exhaustive, &positions), edge_set(&gridded, &positions));
        }

        #[test]
        fn every_close_pair_is_an_edge(
            coords in prop::collection::vec((0.0f32..300.0, 0.0f32..300.0), 2..40),
        ) {
            let positions: Vec<Vec2> = coords.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
            let renderer = ConnectionRenderer::default();
            let edges = edge_set(&renderer, &positions);
            for a in 0..positions.len() {
                for b in a + 1..positions.len() {
                    let close = positions[a].distance(positions[b]) < renderer.max_distance;
                    prop_assert_eq!(close, edges.contains(&(a, b)));
                }
            }
        }
    }
}
