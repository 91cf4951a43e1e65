//! HSV color math for the ambient paint
//!
//! Hue is kept in degrees on `[0, 360)`, saturation and value on `[0, 1]`.
//! Every constructor and mutator re-normalizes, so an [`Hsv`] observed from
//! outside always satisfies those ranges.

mod drift;

pub use drift::ColorDrift;

use pigment_config::AnchorColor;
use serde::{Deserialize, Serialize};

/// Wrap any finite angle into `[0, 360)`.
/// Non-finite input maps to 0.
#[inline]
pub fn wrap_hue(hue: f32) -> f32 {
    if !hue.is_finite() {
        return 0.0;
    }
    let wrapped = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed shortest angular distance from `from` to `to`, in `[-180, 180]`.
///
/// Adding the result to `from` lands on `to` modulo 360, going the short way
/// around the wheel.
#[inline]
pub fn shortest_hue_delta(from: f32, to: f32) -> f32 {
    let mut d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d -= 360.0;
    }
    d
}

/// Color in HSV space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Hsv {
    pub fn new(hue: f32, saturation: f32, value: f32) -> Self {
        let mut color = Self {
            hue,
            saturation,
            value,
        };
        color.normalize();
        color
    }

    /// Re-establish the range invariants in place
    #[inline]
    pub fn normalize(&mut self) {
        self.hue = wrap_hue(self.hue);
        self.saturation = clamp_unit(self.saturation);
        self.value = clamp_unit(self.value);
    }

    /// Copy with hue rotated by `degrees`
    pub fn shifted(self, degrees: f32, saturation_delta: f32, value_delta: f32) -> Self {
        Self::new(
            self.hue + degrees,
            self.saturation + saturation_delta,
            self.value + value_delta,
        )
    }

    /// Convert to straight-alpha RGBA (0.0-1.0 per channel)
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        let h = wrap_hue(self.hue) / 60.0;
        let s = clamp_unit(self.saturation);
        let v = clamp_unit(self.value);

        let c = v * s;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        [r + m, g + m, b + m, clamp_unit(alpha)]
    }
}

impl From<&AnchorColor> for Hsv {
    fn from(anchor: &AnchorColor) -> Self {
        Self::new(anchor.hue, anchor.saturation, anchor.value)
    }
}

#[inline]
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
