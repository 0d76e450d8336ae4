//! Layered field configuration
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `PLEXUS_PARTICLE_CAP`, `PLEXUS_MAX_DISTANCE`,
//!    `PLEXUS_DENSITY_DIVISOR`
//! 2. Project-local: `.plexus/config.toml`
//! 3. Global: `~/.plexus/config.toml`

use crate::error::{PlexusError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Hex color overrides for one palette
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteOverride {
    pub particle: Option<String>,
    pub line: Option<String>,
    pub backdrop: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteOverrides {
    pub light: PaletteOverride,
    pub dark: PaletteOverride,
}

/// Every tunable of the particle field, connections and theme handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Upper bound on the population regardless of surface area
    pub particle_cap: usize,
    /// Square logical pixels per particle
    pub density_divisor: f64,
    /// Particles closer than this are connected
    pub max_distance: f32,
    /// Each velocity axis is drawn from `[-velocity_range, velocity_range]`
    pub velocity_range: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub opacity_min: f32,
    pub opacity_max: f32,
    pub pulse_speed_min: f32,
    pub pulse_speed_max: f32,
    pub size_pulse_amplitude: f32,
    pub opacity_pulse_amplitude: f32,
    /// Halo radius as a multiple of the particle's current size
    pub halo_radius_multiplier: f32,
    pub connection_opacity_scale: f32,
    pub connection_width_scale: f32,
    /// Populations above this size use the spatial grid for connections
    pub grid_threshold: usize,
    /// Bake palette colors into particles and reseed whenever the theme flips
    pub reseed_on_theme_change: bool,
    pub palette: PaletteOverrides,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_cap: 120,
            density_divisor: 15000.0,
            max_distance: 120.0,
            velocity_range: 1.0,
            size_min: 1.0,
            size_max: 3.0,
            opacity_min: 0.2,
            opacity_max: 0.7,
            pulse_speed_min: 0.01,
            pulse_speed_max: 0.03,
            size_pulse_amplitude: 0.5,
            opacity_pulse_amplitude: 0.2,
            halo_radius_multiplier: 2.0,
            connection_opacity_scale: 0.3,
            connection_width_scale: 1.5,
            grid_threshold: 120,
            reseed_on_theme_change: false,
            palette: PaletteOverrides::default(),
        }
    }
}

const MAX_PARTICLE_CAP: usize = 10_000;

impl FieldConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut merged = toml::Table::new();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                log::debug!("loading global config {}", global_path.display());
                merge_tables(&mut merged, Self::read_table(&global_path)?);
            }
        }

        let local_path = PathBuf::from(".plexus/config.toml");
        if local_path.exists() {
            log::debug!("loading project config {}", local_path.display());
            merge_tables(&mut merged, Self::read_table(&local_path)?);
        }

        let mut config: FieldConfig = toml::Value::Table(merged).try_into()?;
        config.apply_env_overrides_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a single file, without env overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FieldConfig = toml::from_str(&content).map_err(|e| {
            PlexusError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PLEXUS_*` overrides looked up through `lookup`
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PLEXUS_PARTICLE_CAP") {
            self.particle_cap = parse_env("PLEXUS_PARTICLE_CAP", &v)?;
        }
        if let Some(v) = lookup("PLEXUS_MAX_DISTANCE") {
            self.max_distance = parse_env("PLEXUS_MAX_DISTANCE", &v)?;
        }
        if let Some(v) = lookup("PLEXUS_DENSITY_DIVISOR") {
            self.density_divisor = parse_env("PLEXUS_DENSITY_DIVISOR", &v)?;
        }
        Ok(())
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<()> {
        check_range(
            "particle_cap",
            self.particle_cap as f64,
            0.0,
            MAX_PARTICLE_CAP as f64,
        )?;
        check_range("density_divisor", self.density_divisor, f64::MIN_POSITIVE, f64::MAX)?;
        check_range("max_distance", self.max_distance as f64, f64::MIN_POSITIVE, f64::MAX)?;
        check_range("velocity_range", self.velocity_range as f64, 0.0, f64::MAX)?;
        check_range("size_max", self.size_max as f64, 0.0, f64::MAX)?;
        check_range("size_min", self.size_min as f64, 0.0, self.size_max as f64)?;
        check_range("opacity_min", self.opacity_min as f64, 0.0, self.opacity_max as f64)?;
        check_range("opacity_max", self.opacity_max as f64, 0.0, 1.0)?;
        check_range("pulse_speed_max", self.pulse_speed_max as f64, 0.0, f64::MAX)?;
        check_range(
            "pulse_speed_min",
            self.pulse_speed_min as f64,
            0.0,
            self.pulse_speed_max as f64,
        )?;
        check_range("size_pulse_amplitude", self.size_pulse_amplitude as f64, 0.0, f64::MAX)?;
        check_range(
            "opacity_pulse_amplitude",
            self.opacity_pulse_amplitude as f64,
            0.0,
            1.0,
        )?;
        check_range("halo_radius_multiplier", self.halo_radius_multiplier as f64, 0.0, f64::MAX)?;
        check_range(
            "connection_opacity_scale",
            self.connection_opacity_scale as f64,
            0.0,
            1.0,
        )?;
        check_range("connection_width_scale", self.connection_width_scale as f64, 0.0, f64::MAX)?;
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".plexus").join("config.toml"))
    }

    fn read_table(path: &Path) -> Result<toml::Table> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str::<toml::Table>(&content).map_err(|e| {
            PlexusError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }
}

/// Deep-merge `overlay` into `base`; nested tables merge key by key
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        let incoming = match value {
            toml::Value::Table(table) => table,
            other => {
                base.insert(key, other);
                continue;
            }
        };
        if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
            merge_tables(existing, incoming);
            continue;
        }
        base.insert(key, toml::Value::Table(incoming));
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| PlexusError::ConfigError(format!("{key}={value}: {e}")))
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_nan() || value < min || value > max {
        return Err(PlexusError::ValueOutOfRange {
            field: field.to_string(),
            min,
            max,
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_config(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "plexus_config_test_{}_{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        std::fs::remove_file(path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    #[test]
    fn defaults_are_valid() {
        let config = FieldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.particle_cap, 120);
        assert_eq!(config.density_divisor, 15000.0);
        assert_eq!(config.max_distance, 120.0);
        assert!(!config.reseed_on_theme_change);
    }

    #[test]
    fn test_load_config_from_file() {
        let config_str = r##"
particle_cap = 200
max_distance = 90.0
reseed_on_theme_change = true

[palette.dark]
particle = "#ff8844"
"##;
        let path = temp_config("load", config_str);
        let config = FieldConfig::load_from_file(&path).unwrap();

        assert_eq!(config.particle_cap, 200);
        assert!((config.max_distance - 90.0).abs() < 1e-6);
        assert!(config.reseed_on_theme_change);
        assert_eq!(config.palette.dark.particle.as_deref(), Some("#ff8844"));
        // Untouched keys keep their defaults
        assert_eq!(config.density_divisor, 15000.0);

        cleanup(&path);
    }

    #[test]
    fn invalid_file_values_are_rejected() {
        let path = temp_config("invalid", "opacity_max = 1.5\n");
        let err = FieldConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, PlexusError::ValueOutOfRange { ref field, .. } if field == "opacity_max"));
        cleanup(&path);
    }

    #[test]
    fn env_overrides_win() {
        let mut config = FieldConfig::default();
        config
            .apply_env_overrides_with(|key| match key {
                "PLEXUS_PARTICLE_CAP" => Some("64".to_string()),
                "PLEXUS_MAX_DISTANCE" => Some(" 80.5 ".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.particle_cap, 64);
        assert!((config.max_distance - 80.5).abs() < 1e-6);
        assert_eq!(config.density_divisor, 15000.0);
    }

    #[test]
    fn malformed_env_override_is_an_error() {
        let mut config = FieldConfig::default();
        let result = config.apply_env_overrides_with(|key| {
            (key == "PLEXUS_DENSITY_DIVISOR").then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(PlexusError::ConfigError(_))));
    }

    #[test]
    fn merge_tables_is_deep() {
        let mut base: toml::Table = toml::from_str(
            r##"
particle_cap = 10
[palette.light]
particle = "#000000"
line = "#111111"
"##,
        )
        .unwrap();
        let overlay: toml::Table = toml::from_str(
            r##"
[palette.light]
line = "#222222"
"##,
        )
        .unwrap();
        merge_tables(&mut base, overlay);
        let config: FieldConfig = toml::Value::Table(base).try_into().unwrap();
        assert_eq!(config.particle_cap, 10);
        assert_eq!(config.palette.light.particle.as_deref(), Some("#000000"));
        assert_eq!(config.palette.light.line.as_deref(), Some("#222222"));
    }

    #[test]
    fn inverted_ranges_fail_validation() {
        let config = FieldConfig {
            size_min: 4.0,
            size_max: 2.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = FieldConfig {
            density_divisor: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_tunables_fail_validation() {
        let config: FieldConfig = toml::from_str("opacity_pulse_amplitude = nan\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, PlexusError::ValueOutOfRange { ref field, .. } if field == "opacity_pulse_amplitude")
        );

        let config: FieldConfig = toml::from_str("size_max = inf\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PlexusError::ValueOutOfRange { ref field, .. } if field == "size_max"));

        let config: FieldConfig = toml::from_str("pulse_speed_max = inf\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, PlexusError::ValueOutOfRange { ref field, .. } if field == "pulse_speed_max")
        );

        let config = FieldConfig {
            size_pulse_amplitude: f32::NEG_INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
