//! Anchor colors the ambient paint drifts between.

use serde::{Deserialize, Serialize};

/// A named palette anchor in HSV space.
///
/// `hue` is in degrees, `saturation` and `value` in 0.0-1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorColor {
    pub name: String,
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl AnchorColor {
    pub fn new(name: impl Into<String>, hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            name: name.into(),
            hue,
            saturation,
            value,
        }
    }
}

/// Earth pigments (approximate art-supply tones)
pub fn earth_palette() -> Vec<AnchorColor> {
    vec![
        AnchorColor::new("Yellow Ochre", 45.0, 0.66, 0.82),
        AnchorColor::new("Burnt Sienna", 20.0, 0.71, 0.70),
        AnchorColor::new("Burnt Umber", 30.0, 0.52, 0.38),
        AnchorColor::new("Alizarin Crimson", 350.0, 0.79, 0.63),
        AnchorColor::new("Ultramarine", 225.0, 0.62, 0.51),
        AnchorColor::new("Oxide Green", 160.0, 0.46, 0.42),
    ]
}
