//! Frame statistics command: runs the loop on a recording surface

use super::load_config;
use anyhow::{Context, Result};
use plexus_core::{Canvas, FieldConfig, SurfaceMetrics};
use plexus_particles::ConnectionRenderer;
use plexus_render::{CommandCounts, RecordingCanvas};
use plexus_runtime::{BackgroundStats, ManualHost, ParticleBackground};
use serde::Serialize;

pub struct InspectArgs {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
    pub frames: usize,
    pub dark: bool,
    pub config: Option<String>,
}

#[derive(Serialize)]
struct SurfaceReport {
    width: f32,
    height: f32,
    dpr: f32,
    backing_width: u32,
    backing_height: u32,
}

#[derive(Serialize)]
struct InspectReport {
    surface: SurfaceReport,
    frames_requested: usize,
    connection_strategy: String,
    background: BackgroundStats,
    last_frame: CommandCounts,
    total: CommandCounts,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let report = build_report(&args, config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn build_report(args: &InspectArgs, config: FieldConfig) -> Result<InspectReport> {
    let connections = ConnectionRenderer::from_config(&config);
    let metrics =
        SurfaceMetrics::new(args.width, args.height, args.dpr).context("Invalid surface size")?;

    let mut background = ParticleBackground::mount(
        Some(RecordingCanvas::last_frame_only()),
        ManualHost::new(),
        metrics,
        args.dark,
        config,
    )
    .context("Failed to mount background")?;
    background.pump_frames(args.frames);

    let stats = background.stats();
    let canvas = background
        .canvas()
        .context("Background has no drawing surface")?;
    let (backing_width, backing_height) = canvas.backing_size();

    let report = InspectReport {
        surface: SurfaceReport {
            width: metrics.width,
            height: metrics.height,
            dpr: metrics.dpr,
            backing_width,
            backing_height,
        },
        frames_requested: background.host().frames_requested(),
        connection_strategy: format!("{:?}", connections.strategy_for(stats.particles)),
        last_frame: canvas.counts(),
        total: canvas.total_counts(),
        background: stats,
    };
    Ok(report)
}
