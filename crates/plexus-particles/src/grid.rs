//! Uniform bucket grid for neighbor queries on large populations

use plexus_core::Vec2;
use std::collections::HashMap;

/// Forward half of the 8-neighborhood. Visiting only these from every cell
/// reaches each pair of adjacent cells exactly once.
const FORWARD_NEIGHBORS: [(i32, i32); 4] = [(1, 0), (-1, 1), (0, 1), (1, 1)];

/// Sparse grid of particle indices keyed by cell coordinate
pub struct SpatialGrid {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f32,
}

impl SpatialGrid {
    /// Bucket `positions` into square cells of `cell_size`. Any two points
    /// closer than `cell_size` land in the same or adjacent cells.
    pub fn build(positions: &[Vec2], cell_size: f32) -> Self {
        let mut cells: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
        for (index, pos) in positions.iter().enumerate() {
            cells
                .entry(cell_of(*pos, cell_size))
                .or_default()
                .push(index);
        }
        Self { cells, cell_size }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Call `f(a, b)` with `a < b` for every candidate pair, each exactly once.
    pub fn for_each_candidate_pair<F: FnMut(usize, usize)>(&self, mut f: F) {
        for (&(cx, cy), members) in &self.cells {
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    f(a.min(b), a.max(b));
                }
            }

            for (dx, dy) in FORWARD_NEIGHBORS {
                let (Some(nx), Some(ny)) = (cx.checked_add(dx), cy.checked_add(dy)) else {
                    continue;
                };
                let Some(neighbors) = self.cells.get(&(nx, ny)) else {
                    continue;
                };
                for &a in members {
                    for &b in neighbors {
                        f(a.min(b), a.max(b));
                    }
                }
            }
        }
    }
}

/// Coordinates beyond the `i32` range saturate into the edge cells.
fn cell_of(pos: Vec2, cell_size: f32) -> (i32, i32) {
    (
        (pos.x / cell_size).floor() as i32,
        (pos.y / cell_size).floor() as i32,
    )
}
