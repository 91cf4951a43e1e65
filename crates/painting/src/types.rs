use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Hsv;

/// Input device that produced a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    /// Map a DOM `pointerType` string. Unknown types count as mouse.
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "pen" => Self::Pen,
            "touch" => Self::Touch,
            _ => Self::Mouse,
        }
    }
}

/// One pointer position sample in viewport CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub position: Vec2,
    /// Reported pressure 0.0-1.0 (0 when the device reports none)
    pub pressure: f32,
    /// Event timestamp in milliseconds
    pub time_ms: f64,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, pressure: f32, time_ms: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            pressure,
            time_ms,
        }
    }
}

/// Small pale fleck laid over a firmly pressed mark
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Highlight {
    pub center: Vec2,
    pub radius: f32,
}

/// A single fading paint mark
///
/// Dabs never change after creation; only their age advances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dab {
    /// Center in viewport CSS pixels
    pub center: Vec2,
    /// Horizontal radius before rotation
    pub radius_x: f32,
    /// Vertical radius before rotation
    pub radius_y: f32,
    /// Rotation in radians
    pub angle: f32,
    pub color: Hsv,
    /// Core opacity at birth
    pub base_alpha: f32,
    pub born_ms: f64,
    pub highlight: Option<Highlight>,
}

impl Dab {
    /// Unrotated circular dab
    pub fn circle(center: Vec2, radius: f32, color: Hsv, base_alpha: f32, born_ms: f64) -> Self {
        Self {
            center,
            radius_x: radius,
            radius_y: radius,
            angle: 0.0,
            color,
            base_alpha,
            born_ms,
            highlight: None,
        }
    }

    /// Milliseconds since the dab was created (never negative)
    #[inline]
    pub fn age(&self, now_ms: f64) -> f64 {
        (now_ms - self.born_ms).max(0.0)
    }

    #[inline]
    pub fn is_expired(&self, now_ms: f64, lifespan_ms: f64) -> bool {
        self.age(now_ms) >= lifespan_ms
    }

    /// Remaining fraction of life `1 - age/lifespan`, or `None` once expired
    pub fn life_fraction(&self, now_ms: f64, lifespan_ms: f64) -> Option<f32> {
        if self.is_expired(now_ms, lifespan_ms) {
            return None;
        }
        Some((1.0 - self.age(now_ms) / lifespan_ms) as f32)
    }

    /// Core opacity at `now_ms`, or `None` once expired
    pub fn alpha_at(&self, now_ms: f64, lifespan_ms: f64) -> Option<f32> {
        self.life_fraction(now_ms, lifespan_ms)
            .map(|life| self.base_alpha * life)
    }

    /// Outer radius of the gradient
    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.radius_x.max(self.radius_y)
    }
}
