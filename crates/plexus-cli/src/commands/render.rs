//! Headless background-to-PNG render command

use super::load_config;
use anyhow::{Context, Result};
use plexus_core::SurfaceMetrics;
use plexus_render::PixelCanvas;
use plexus_runtime::{ManualHost, ParticleBackground};

pub struct RenderArgs {
    pub output: String,
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
    pub frames: usize,
    pub dark: bool,
    pub transparent: bool,
    pub config: Option<String>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let metrics =
        SurfaceMetrics::new(args.width, args.height, args.dpr).context("Invalid surface size")?;

    let mut background = ParticleBackground::mount(
        Some(PixelCanvas::new(1, 1)),
        ManualHost::new(),
        metrics,
        args.dark,
        config,
    )
    .context("Failed to mount background")?;

    let ticks = background.pump_frames(args.frames);
    let stats = background.stats();
    let canvas = background
        .canvas()
        .context("Background has no drawing surface")?;
    let palette = background.palette().context("Background has no palette")?;

    let image = if args.transparent {
        canvas.to_image()
    } else {
        canvas.composite_over(palette.backdrop)
    };
    image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output))?;

    let (px_w, px_h) = metrics.physical_size();
    println!("Rendered {} frames to {}", ticks, args.output);
    println!("  Size:      {}x{} px", px_w, px_h);
    println!("  Particles: {}", stats.particles);
    println!("  Edges:     {}", stats.edges_last_frame);
    println!("  Theme:     {}", if args.dark { "dark" } else { "light" });

    background.unmount();
    Ok(())
}
