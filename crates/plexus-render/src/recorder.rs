//! Canvas that records draw calls instead of rasterizing them

use plexus_core::{Canvas, Color, Vec2};
use serde::Serialize;

/// One recorded canvas call, coordinates as passed in (logical units)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetBackingSize {
        width: u32,
        height: u32,
    },
    ResetTransform,
    Scale(f32),
    Clear,
    Halo {
        center: Vec2,
        radius: f32,
        color: Color,
        opacity: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        opacity: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
        opacity: f32,
    },
}

impl DrawCommand {
    /// Whether this call changes pixel content
    pub fn mutates_pixels(&self) -> bool {
        !matches!(self, DrawCommand::ResetTransform | DrawCommand::Scale(_))
    }
}

/// Per-kind totals over a command log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommandCounts {
    pub resizes: usize,
    pub transforms: usize,
    pub clears: usize,
    pub halos: usize,
    pub circles: usize,
    pub lines: usize,
}

impl CommandCounts {
    pub fn from_commands(commands: &[DrawCommand]) -> Self {
        let mut counts = Self::default();
        for command in commands {
            counts.record(command);
        }
        counts
    }

    pub fn record(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::SetBackingSize { .. } => self.resizes += 1,
            DrawCommand::ResetTransform | DrawCommand::Scale(_) => self.transforms += 1,
            DrawCommand::Clear => self.clears += 1,
            DrawCommand::Halo { .. } => self.halos += 1,
            DrawCommand::Circle { .. } => self.circles += 1,
            DrawCommand::Line { .. } => self.lines += 1,
        }
    }
}

/// Canvas that logs every call.
///
/// By default the log grows for the canvas's lifetime. A canvas built with
/// `last_frame_only` drops the log on every `clear`, so it holds at most one
/// frame; `total_counts` still covers everything recorded.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    backing: (u32, u32),
    scale: f32,
    commands: Vec<DrawCommand>,
    totals: CommandCounts,
    last_frame_only: bool,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            backing: (0, 0),
            scale: 1.0,
            commands: Vec::new(),
            totals: CommandCounts::default(),
            last_frame_only: false,
        }
    }

    /// A recorder whose log restarts at every `clear`
    pub fn last_frame_only() -> Self {
        Self {
            last_frame_only: true,
            ..Self::new()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the log, keeping backing size and transform
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Counts over the current log
    pub fn counts(&self) -> CommandCounts {
        CommandCounts::from_commands(&self.commands)
    }

    /// Counts over every call since construction, drained or not
    pub fn total_counts(&self) -> CommandCounts {
        self.totals
    }

    pub fn mutation_count(&self) -> usize {
        self.commands.iter().filter(|c| c.mutates_pixels()).count()
    }

    /// Accumulated uniform scale
    pub fn current_scale(&self) -> f32 {
        self.scale
    }

    fn push(&mut self, command: DrawCommand) {
        self.totals.record(&command);
        self.commands.push(command);
    }
}

impl Canvas for RecordingCanvas {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
        self.push(DrawCommand::SetBackingSize { width, height });
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    fn reset_transform(&mut self) {
        self.scale = 1.0;
        self.push(DrawCommand::ResetTransform);
    }

    fn scale(&mut self, factor: f32) {
        self.scale *= factor;
        self.push(DrawCommand::Scale(factor));
    }

    fn clear(&mut self) {
        if self.last_frame_only {
            self.commands.clear();
        }
        self.push(DrawCommand::Clear);
    }

    fn fill_halo(&mut self, center: Vec2, radius: f32, color: Color, opacity: f32) {
        self.push(DrawCommand::Halo {
            center,
            radius,
            color,
            opacity,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, opacity: f32) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            color,
            opacity,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, opacity: f32) {
        self.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
            opacity,
        });
    }
}
