//! Error types for Plexus

use thiserror::Error;

/// The main error type for Plexus operations
#[derive(Debug, Error)]
pub enum PlexusError {
    #[error("Invalid surface: {0}")]
    InvalidSurface(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Host unavailable: {0}")]
    HostUnavailable(String),
}

/// Result type alias for Plexus operations
pub type Result<T> = std::result::Result<T, PlexusError>;

impl From<toml::de::Error> for PlexusError {
    fn from(err: toml::de::Error) -> Self {
        PlexusError::TomlParseError(err.to_string())
    }
}
