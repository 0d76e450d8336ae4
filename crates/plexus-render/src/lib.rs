//! Plexus Render - canvas backends and presentation
//!
//! - `PixelCanvas` - software RGBA rasterizer (halos, discs, lines)
//! - `RecordingCanvas` - command log for diagnostics and tests
//! - `CanvasSurfaceManager` - backing-store sizing and DPR scaling
//! - `RenderContext` / `FramePresenter` - wgpu window surface and the blit
//!   pass that shows a rasterized frame

mod context;
mod present;
mod raster;
mod recorder;
mod surface;

pub use context::{RenderContext, RenderError};
pub use present::FramePresenter;
pub use raster::PixelCanvas;
pub use recorder::{CommandCounts, DrawCommand, RecordingCanvas};
pub use surface::CanvasSurfaceManager;

#[cfg(test)]
mod tests {
    #[test]
    fn blit_shader_wgsl_parses() {
        let source = include_str!("blit_shader.wgsl");
        naga::front::wgsl::parse_str(source).expect("blit_shader.wgsl failed to parse");
    }
}
