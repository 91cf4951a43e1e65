//! Shared configuration for the pigment painter
//!
//! This crate provides the single source of truth for viewport dimensions,
//! the anchor palette, brush tuning and gesture gating settings shared by
//! every host (browser canvas, native replay).

use serde::{Deserialize, Serialize};

mod error;
mod painter;
mod palette;

pub use error::ConfigError;
pub use painter::{
    BrushConfig, DriftConfig, GateConfig, LockMode, PainterConfig, MAX_MARKS_PER_SAMPLE,
};
pub use palette::{earth_palette, AnchorColor};

/// Default viewport width in CSS pixels
pub const DEFAULT_WIDTH: u32 = 1280;

/// Default viewport height in CSS pixels
pub const DEFAULT_HEIGHT: u32 = 800;

/// Default device pixel ratio (1.0 = no scaling)
pub const DEFAULT_SCALE: f32 = 1.0;

/// Lowest device pixel ratio the drawing surface is allocated at
pub const MIN_SCALE: f32 = 1.0;

/// Highest device pixel ratio the drawing surface is allocated at
pub const MAX_SCALE: f32 = 3.0;

/// Viewport configuration for the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Viewport width in CSS pixels
    pub width: u32,
    /// Viewport height in CSS pixels
    pub height: u32,
    /// Device pixel ratio
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    DEFAULT_SCALE
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
        }
    }

    /// Builder-style device pixel ratio override
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Device pixel ratio clamped to the supported range.
    /// Non-finite ratios fall back to 1.0.
    pub fn clamped_scale(&self) -> f32 {
        if self.scale.is_finite() {
            self.scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            MIN_SCALE
        }
    }

    /// Get scaled width (for physical pixel calculations)
    pub fn scaled_width(&self) -> u32 {
        (self.width as f32 * self.clamped_scale()).floor() as u32
    }

    /// Get scaled height (for physical pixel calculations)
    pub fn scaled_height(&self) -> u32 {
        (self.height as f32 * self.clamped_scale()).floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DisplayConfig::default();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.scale, DEFAULT_SCALE);
    }

    #[test]
    fn test_scaled_dimensions() {
        let config = DisplayConfig::new(640, 480).with_scale(2.0);
        assert_eq!(config.scaled_width(), 1280);
        assert_eq!(config.scaled_height(), 960);
    }

    #[test]
    fn test_scale_is_clamped() {
        assert_eq!(DisplayConfig::default().with_scale(0.5).clamped_scale(), 1.0);
        assert_eq!(DisplayConfig::default().with_scale(4.0).clamped_scale(), 3.0);
        assert_eq!(DisplayConfig::default().with_scale(f32::NAN).clamped_scale(), 1.0);
    }

    #[test]
    fn test_scale_defaults_when_missing_from_json() {
        let config: DisplayConfig = serde_json::from_str(r#"{"width": 10, "height": 20}"#).unwrap();
        assert_eq!(config.scale, DEFAULT_SCALE);
    }
}
