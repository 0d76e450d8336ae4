//! Light/dark palette resolution

use crate::config::{PaletteOverride, PaletteOverrides};
use crate::error::Result;
use crate::types::Color;

/// Which of the two fixed palettes is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_dark_flag(is_dark: bool) -> Self {
        if is_dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }
}

/// Colors used to draw one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Particle halo and core color
    pub particle: Color,
    /// Base color for connection lines (opacity applied per edge)
    pub line: Color,
    /// Opaque color the transparent surface is composited over when exported
    pub backdrop: Color,
}

impl Palette {
    pub const DARK: Self = Self {
        particle: Color::new(77.0 / 255.0, 171.0 / 255.0, 247.0 / 255.0),
        line: Color::new(148.0 / 255.0, 163.0 / 255.0, 184.0 / 255.0),
        backdrop: Color::new(10.0 / 255.0, 15.0 / 255.0, 26.0 / 255.0),
    };

    pub const LIGHT: Self = Self {
        particle: Color::new(0.0, 119.0 / 255.0, 1.0),
        line: Color::new(100.0 / 255.0, 116.0 / 255.0, 139.0 / 255.0),
        backdrop: Color::new(248.0 / 255.0, 250.0 / 255.0, 252.0 / 255.0),
    };

    fn with_override(mut self, o: &PaletteOverride) -> Result<Self> {
        if let Some(hex) = &o.particle {
            self.particle = Color::parse_hex(hex)?;
        }
        if let Some(hex) = &o.line {
            self.line = Color::parse_hex(hex)?;
        }
        if let Some(hex) = &o.backdrop {
            self.backdrop = Color::parse_hex(hex)?;
        }
        Ok(self)
    }
}

/// Maps the externally owned dark-mode flag to one of two palettes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeAdapter {
    light: Palette,
    dark: Palette,
}

impl Default for ThemeAdapter {
    fn default() -> Self {
        Self {
            light: Palette::LIGHT,
            dark: Palette::DARK,
        }
    }
}

impl ThemeAdapter {
    pub fn new(light: Palette, dark: Palette) -> Self {
        Self { light, dark }
    }

    /// Build an adapter from the built-in palettes with configured overrides applied
    pub fn from_overrides(overrides: &PaletteOverrides) -> Result<Self> {
        Ok(Self {
            light: Palette::LIGHT.with_override(&overrides.light)?,
            dark: Palette::DARK.with_override(&overrides.dark)?,
        })
    }

    pub fn resolve(&self, is_dark: bool) -> Palette {
        self.palette(ThemeMode::from_dark_flag(is_dark))
    }

    pub fn palette(&self, mode: ThemeMode) -> Palette {
        match mode {
            ThemeMode::Light => self.light,
            ThemeMode::Dark => self.dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_picks_palette_by_flag() {
        let theme = ThemeAdapter::default();
        assert_eq!(theme.resolve(true), Palette::DARK);
        assert_eq!(theme.resolve(false), Palette::LIGHT);
        assert_ne!(theme.resolve(true).particle, theme.resolve(false).particle);
    }

    #[test]
    fn overrides_replace_only_given_entries() {
        let overrides = PaletteOverrides {
            dark: PaletteOverride {
                particle: Some("#ff0000".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let theme = ThemeAdapter::from_overrides(&overrides).unwrap();
        let dark = theme.resolve(true);
        assert_eq!(dark.particle.to_rgb8(), [255, 0, 0]);
        assert_eq!(dark.line, Palette::DARK.line);
        assert_eq!(theme.resolve(false), Palette::LIGHT);
    }

    #[test]
    fn bad_override_is_an_error() {
        let overrides = PaletteOverrides {
            light: PaletteOverride {
                line: Some("blue".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(ThemeAdapter::from_overrides(&overrides).is_err());
    }
}
