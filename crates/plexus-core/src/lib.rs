//! Plexus Core - Foundational types for the Plexus particle background
//!
//! This crate provides the types every other Plexus crate depends on:
//! - `Color` - RGB palette colors
//! - `SurfaceMetrics` - logical surface size and device pixel ratio
//! - `Canvas` - the drawing-context seam implemented by the raster backends
//! - `FieldConfig` - layered TOML configuration of all simulation tunables
//! - `ThemeAdapter` / `Palette` - light/dark color resolution
//! - Error types and Result alias

pub mod canvas;
mod config;
mod error;
pub mod theme;
mod types;

pub use canvas::Canvas;
pub use config::{FieldConfig, PaletteOverride, PaletteOverrides};
pub use error::{PlexusError, Result};
pub use glam::Vec2;
pub use theme::{Palette, ThemeAdapter, ThemeMode};
pub use types::{Color, SurfaceMetrics, MAX_BACKING_DIMENSION};
