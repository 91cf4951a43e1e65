/// Shortest time step used when deriving pointer speed (ms).
/// Two samples with the same timestamp would otherwise divide by zero.
pub const MIN_SAMPLE_INTERVAL_MS: f64 = 1.0;

/// Offset of the middle gradient stop inside a dab.
pub const GRADIENT_MID_STOP: f32 = 0.55;

/// Hue shift (degrees) applied at the middle and outer gradient stops.
pub const GRADIENT_MID_HUE_SHIFT: f32 = 4.0;
pub const GRADIENT_EDGE_HUE_SHIFT: f32 = 10.0;

/// Fraction of the core alpha kept at the middle gradient stop.
pub const GRADIENT_MID_ALPHA: f32 = 0.6;

/// Lower bound of the per-mark alpha scatter (upper bound is 1.0).
pub const MARK_ALPHA_FLOOR: f32 = 0.8;

/// Ancestors inspected when building a pointer target path.
pub const MAX_TARGET_DEPTH: usize = 32;

/// Highlight fleck size and scatter, as fractions of the mark radius.
pub const HIGHLIGHT_RADIUS: f32 = 0.25;
pub const HIGHLIGHT_SCATTER: f32 = 0.2;

/// Highlight fleck color (pale, low saturation) and its opacity at birth.
pub const HIGHLIGHT_SATURATION: f32 = 0.24;
pub const HIGHLIGHT_VALUE: f32 = 0.82;
pub const HIGHLIGHT_ALPHA: f32 = 0.08;
