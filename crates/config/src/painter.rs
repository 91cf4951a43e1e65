//! Painter configuration: brush tuning, color drift, gesture gating.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::palette::{earth_palette, AnchorColor};

/// Default lifespan of a single mark in milliseconds
pub const DEFAULT_LIFESPAN_MS: f64 = 3000.0;

/// Default inactivity window before painting relocks
pub const DEFAULT_RELOCK_AFTER_MS: f64 = 6000.0;

/// Most marks a single motion sample may emit
pub const MAX_MARKS_PER_SAMPLE: u32 = 8;

/// Top-level configuration for the ambient painter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    /// How long a mark stays visible, in milliseconds
    pub lifespan_ms: f64,
    pub brush: BrushConfig,
    pub drift: DriftConfig,
    pub gate: GateConfig,
    /// Ordered anchor colors; the first drift target is picked at random
    pub palette: Vec<AnchorColor>,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            lifespan_ms: DEFAULT_LIFESPAN_MS,
            brush: BrushConfig::default(),
            drift: DriftConfig::default(),
            gate: GateConfig::default(),
            palette: earth_palette(),
        }
    }
}

impl PainterConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every numeric knob is inside its meaningful range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }

        let brush = &self.brush;
        if !(brush.min_radius.is_finite() && brush.max_radius.is_finite())
            || brush.min_radius <= 0.0
            || brush.min_radius > brush.max_radius
        {
            return Err(ConfigError::RadiusRange {
                min: brush.min_radius,
                max: brush.max_radius,
            });
        }

        if !(self.lifespan_ms.is_finite() && self.lifespan_ms > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "lifespan_ms",
                value: self.lifespan_ms as f32,
            });
        }

        check_unit_open("brush.speed_smoothing", brush.speed_smoothing)?;
        check_unit_open("drift.ease", self.drift.ease)?;
        check_unit_closed("drift.retarget_chance", self.drift.retarget_chance)?;
        check_unit_closed("brush.position_jitter", brush.position_jitter)?;
        check_unit_closed("brush.radius_variance", brush.radius_variance)?;
        check_unit_closed("brush.highlight_pressure", brush.highlight_pressure)?;
        check_unit_closed("brush.highlight_chance", brush.highlight_chance)?;

        if !(1..=MAX_MARKS_PER_SAMPLE).contains(&brush.max_marks_per_sample) {
            return Err(ConfigError::OutOfRange {
                field: "brush.max_marks_per_sample",
                value: brush.max_marks_per_sample as f32,
            });
        }

        if let LockMode::LongPress { hold_ms, .. } = self.gate.lock {
            if !(hold_ms.is_finite() && hold_ms >= 0.0) {
                return Err(ConfigError::OutOfRange {
                    field: "gate.lock.hold_ms",
                    value: hold_ms as f32,
                });
            }
        }

        Ok(())
    }
}

/// 0 < value <= 1
fn check_unit_open(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

/// 0 <= value <= 1
fn check_unit_closed(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

/// Brush sizing and texture settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Smallest radius a mark can have, in CSS pixels
    pub min_radius: f32,
    /// Largest radius a mark can have, in CSS pixels
    pub max_radius: f32,
    /// Exponential smoothing factor applied to pointer speed
    pub speed_smoothing: f32,
    /// Smoothed speed each stroke starts from (px/ms)
    pub initial_speed: f32,
    /// Radius gained per px/ms of smoothed speed
    pub speed_gain: f32,
    /// Radius gained at full pressure
    pub pressure_gain: f32,
    /// Pressure assumed when the device reports none
    pub default_pressure: f32,
    /// Positional scatter as a fraction of the radius
    pub position_jitter: f32,
    /// Relative radius scatter per mark
    pub radius_variance: f32,
    /// Upper bound of marks emitted per motion sample
    pub max_marks_per_sample: u32,
    /// Core opacity at zero pressure
    pub base_alpha: f32,
    /// Extra core opacity at full pressure
    pub pressure_alpha: f32,
    /// Pressure above which a mark may carry a light highlight
    pub highlight_pressure: f32,
    /// Chance per mark of a highlight once past `highlight_pressure`
    pub highlight_chance: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            min_radius: 10.0,
            max_radius: 72.0,
            speed_smoothing: 0.35,
            initial_speed: 0.0,
            speed_gain: 16.0,
            pressure_gain: 24.0,
            default_pressure: 0.5,
            position_jitter: 0.18,
            radius_variance: 0.15,
            max_marks_per_sample: 3,
            base_alpha: 0.26,
            pressure_alpha: 0.35,
            highlight_pressure: 0.7,
            highlight_chance: 0.12,
        }
    }
}

/// Color drift settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Fraction of the remaining distance covered per update
    pub ease: f32,
    /// Chance per motion sample of picking a new anchor
    pub retarget_chance: f32,
    /// Per-mark hue scatter in degrees (+/-)
    pub hue_jitter: f32,
    /// Per-mark value scatter (+/-)
    pub value_jitter: f32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            ease: 0.06,
            retarget_chance: 0.02,
            hue_jitter: 4.0,
            value_jitter: 0.06,
        }
    }
}

/// How painting is unlocked
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LockMode {
    /// Painting is always available
    #[default]
    AlwaysOn,
    /// Painting starts locked; a long press near the top edge unlocks it
    LongPress {
        /// How long the press must be held
        hold_ms: f64,
        /// Height of the top band (CSS px) that accepts the press
        top_margin: f32,
    },
}

impl LockMode {
    /// Long-press unlock with the stock timings
    pub fn long_press() -> Self {
        Self::LongPress {
            hold_ms: 700.0,
            top_margin: 80.0,
        }
    }
}

/// Gesture gating settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Selectors whose matching elements (or descendants) never start a stroke
    pub exclusions: Vec<String>,
    /// Let pen input paint over excluded elements
    pub pen_bypasses_exclusion: bool,
    pub lock: LockMode,
    /// Inactivity window before an unlocked painter relocks.
    /// Only meaningful with [`LockMode::LongPress`].
    pub relock_after_ms: Option<f64>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            exclusions: default_exclusions(),
            pen_bypasses_exclusion: false,
            lock: LockMode::default(),
            relock_after_ms: Some(DEFAULT_RELOCK_AFTER_MS),
        }
    }
}

fn default_exclusions() -> Vec<String> {
    [
        "a",
        "button",
        "input",
        "textarea",
        "select",
        "label",
        "img",
        "video",
        "nav",
        ".menu",
        ".lightbox",
        "[role=dialog]",
        "[data-no-paint]",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
