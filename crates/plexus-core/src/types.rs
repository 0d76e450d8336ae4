//! Color and surface types

use crate::error::{PlexusError, Result};
use serde::{Deserialize, Serialize};

/// RGB color with components in [0, 1]. Opacity is supplied per draw call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    /// Parse a `#rrggbb` (or `rrggbb`) string.
    pub fn parse_hex(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(PlexusError::ConfigError(format!(
                "expected a 6-digit hex color, got '{s}'"
            )));
        }
        let hex = u32::from_str_radix(digits, 16)
            .map_err(|e| PlexusError::ConfigError(format!("invalid hex color '{s}': {e}")))?;
        Ok(Self::from_hex(hex))
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Largest backing store side, in physical pixels
pub const MAX_BACKING_DIMENSION: u32 = 32_768;

/// Logical surface dimensions plus the device pixel ratio.
///
/// Particle coordinates live in logical space; the backing store holds
/// `width * dpr` by `height * dpr` physical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceMetrics {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl SurfaceMetrics {
    pub fn new(width: f32, height: f32, dpr: f32) -> Result<Self> {
        let metrics = Self { width, height, dpr };
        metrics.validate()?;
        Ok(metrics)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(PlexusError::InvalidSurface(format!(
                "non-finite size {}x{}",
                self.width, self.height
            )));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(PlexusError::InvalidSurface(format!(
                "negative size {}x{}",
                self.width, self.height
            )));
        }
        if !self.dpr.is_finite() || self.dpr <= 0.0 {
            return Err(PlexusError::InvalidSurface(format!(
                "device pixel ratio must be positive, got {}",
                self.dpr
            )));
        }
        let physical_w = self.width as f64 * self.dpr as f64;
        let physical_h = self.height as f64 * self.dpr as f64;
        let max = MAX_BACKING_DIMENSION as f64;
        if physical_w > max || physical_h > max {
            return Err(PlexusError::InvalidSurface(format!(
                "backing store {physical_w}x{physical_h} exceeds {MAX_BACKING_DIMENSION} px per side"
            )));
        }
        Ok(())
    }

    /// Backing store size in physical pixels (truncated).
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr) as u32,
            (self.height * self.dpr) as u32,
        )
    }

    /// Logical area in square CSS pixels.
    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0xFF8844);
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.533).abs() < 0.01);
        assert!((c.b - 0.267).abs() < 0.01);
    }

    #[test]
    fn test_parse_hex_with_and_without_hash() {
        assert_eq!(Color::parse_hex("#0077ff").unwrap().to_rgb8(), [0, 119, 255]);
        assert_eq!(Color::parse_hex("4dabf7").unwrap().to_rgb8(), [77, 171, 247]);
        assert!(Color::parse_hex("#fff").is_err());
        assert!(Color::parse_hex("#gg0000").is_err());
    }

    #[test]
    fn test_physical_size_scales_by_dpr() {
        let m = SurfaceMetrics::new(800.0, 600.0, 2.0).unwrap();
        assert_eq!(m.physical_size(), (1600, 1200));

        let m = SurfaceMetrics::new(333.0, 100.0, 1.5).unwrap();
        assert_eq!(m.physical_size(), (499, 150));
    }

    #[test]
    fn test_invalid_metrics_rejected() {
        assert!(SurfaceMetrics::new(-1.0, 10.0, 1.0).is_err());
        assert!(SurfaceMetrics::new(10.0, f32::NAN, 1.0).is_err());
        assert!(SurfaceMetrics::new(10.0, 10.0, 0.0).is_err());
        assert!(SurfaceMetrics::new(0.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_oversized_backing_store_rejected() {
        assert!(SurfaceMetrics::new(1.0e12, 1.0, 1.0).is_err());
        assert!(SurfaceMetrics::new(20_000.0, 100.0, 2.0).is_err());
        assert!(SurfaceMetrics::new(16_384.0, 16_384.0, 2.0).is_ok());
        assert!(matches!(
            SurfaceMetrics::new(1.0, f32::MAX, 1.0),
            Err(PlexusError::InvalidSurface(_))
        ));
    }
}
