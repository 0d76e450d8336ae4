//! Backing-store sizing and device-pixel-ratio scaling for a canvas

use plexus_core::{Canvas, Result, SurfaceMetrics};

/// Owns a canvas and keeps its backing store in step with the logical
/// surface size.
pub struct CanvasSurfaceManager<C: Canvas> {
    canvas: C,
    metrics: Option<SurfaceMetrics>,
}

impl<C: Canvas> CanvasSurfaceManager<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            metrics: None,
        }
    }

    /// Size the backing store to `width*dpr x height*dpr` and install a
    /// fresh `dpr` scale so drawing uses logical coordinates.
    ///
    /// Invalid metrics leave the canvas untouched.
    pub fn resize(&mut self, metrics: SurfaceMetrics) -> Result<()> {
        metrics.validate()?;
        let (width, height) = metrics.physical_size();
        self.canvas.set_backing_size(width, height);
        self.canvas.reset_transform();
        self.canvas.scale(metrics.dpr);
        self.metrics = Some(metrics);
        log::debug!(
            "[surface] resized to {}x{} logical, {}x{} physical (dpr {})",
            metrics.width,
            metrics.height,
            width,
            height,
            metrics.dpr
        );
        Ok(())
    }

    /// Logical size and dpr from the last successful resize
    pub fn metrics(&self) -> Option<SurfaceMetrics> {
        self.metrics
    }

    /// Logical (width, height), zero before the first resize
    pub fn logical_size(&self) -> (f32, f32) {
        self.metrics.map_or((0.0, 0.0), |m| (m.width, m.height))
    }

    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }
}
