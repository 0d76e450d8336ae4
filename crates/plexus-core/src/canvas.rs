//! Drawing-context trait shared by the simulation and the raster backends

use crate::types::Color;
use glam::Vec2;

/// A 2D drawing context with a physical backing store and a uniform scale
/// transform. All drawing coordinates are in logical units; implementations
/// map them through the current scale.
pub trait Canvas {
    /// Resize the backing store to `width` x `height` physical pixels.
    /// Contents are discarded.
    fn set_backing_size(&mut self, width: u32, height: u32);

    fn backing_size(&self) -> (u32, u32);

    /// Drop any accumulated transform, back to identity.
    fn reset_transform(&mut self);

    /// Multiply the current transform by a uniform scale.
    fn scale(&mut self, factor: f32);

    /// Clear the full backing store to transparent.
    fn clear(&mut self);

    /// Radial gradient disc: `opacity` at `center`, fading to 0 at `radius`.
    fn fill_halo(&mut self, center: Vec2, radius: f32, color: Color, opacity: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, opacity: f32);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, opacity: f32);
}
