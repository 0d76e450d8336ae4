//! Plexus CLI - render, inspect and preview the particle background

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{inspect, play, render};

#[derive(Parser)]
#[command(name = "plexus")]
#[command(about = "Drifting particle field with proximity lines", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the background to a PNG image (headless)
    Render {
        /// Output image path
        #[arg(short, long, default_value = "plexus.png")]
        output: String,

        /// Logical width in CSS pixels
        #[arg(long, default_value = "1280")]
        width: f32,

        /// Logical height in CSS pixels
        #[arg(long, default_value = "720")]
        height: f32,

        /// Device pixel ratio
        #[arg(long, default_value = "1.0")]
        dpr: f32,

        /// Animation frames to run before capturing
        #[arg(long, default_value = "60")]
        frames: usize,

        /// Use the dark palette
        #[arg(long)]
        dark: bool,

        /// Keep the background transparent instead of filling the backdrop color
        #[arg(long)]
        transparent: bool,

        /// Config file (defaults to the layered lookup)
        #[arg(long)]
        config: Option<String>,
    },

    /// Run frames against a recording surface and print JSON statistics
    Inspect {
        /// Logical width in CSS pixels
        #[arg(long, default_value = "1280")]
        width: f32,

        /// Logical height in CSS pixels
        #[arg(long, default_value = "720")]
        height: f32,

        /// Device pixel ratio
        #[arg(long, default_value = "1.0")]
        dpr: f32,

        /// Animation frames to run
        #[arg(long, default_value = "60")]
        frames: usize,

        /// Use the dark palette
        #[arg(long)]
        dark: bool,

        /// Config file (defaults to the layered lookup)
        #[arg(long)]
        config: Option<String>,
    },

    /// Open a window with the live animation
    Play {
        /// Initial window width in logical pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Initial window height in logical pixels
        #[arg(long, default_value = "720")]
        height: u32,

        /// Start with the dark palette
        #[arg(long)]
        dark: bool,

        /// Launch in fullscreen mode
        #[arg(long)]
        fullscreen: bool,

        /// Config file (defaults to the layered lookup)
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            output,
            width,
            height,
            dpr,
            frames,
            dark,
            transparent,
            config,
        } => render::run(render::RenderArgs {
            output,
            width,
            height,
            dpr,
            frames,
            dark,
            transparent,
            config,
        }),
        Commands::Inspect {
            width,
            height,
            dpr,
            frames,
            dark,
            config,
        } => inspect::run(inspect::InspectArgs {
            width,
            height,
            dpr,
            frames,
            dark,
            config,
        }),
        Commands::Play {
            width,
            height,
            dark,
            fullscreen,
            config,
        } => play::run(play::PlayArgs {
            width,
            height,
            dark,
            fullscreen,
            config,
        }),
    }
}
