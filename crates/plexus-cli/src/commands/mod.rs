//! CLI command implementations

pub mod inspect;
pub mod play;
pub mod render;

use anyhow::{Context, Result};
use plexus_core::FieldConfig;
use std::path::Path;

/// An explicit file wins; otherwise the global/local/env layers apply.
pub fn load_config(path: Option<&str>) -> Result<FieldConfig> {
    match path {
        Some(path) => FieldConfig::load_from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path)),
        None => FieldConfig::load().context("Failed to load config"),
    }
}
