//! Pigment painting system - ambient strokes that fade on their own
//!
//! This crate provides the core of the decorative paint layer:
//! - [`brush`] - Speed and pressure driven dab generation
//! - [`color`] - HSV colors and drift toward palette anchors
//! - [`types`] - Pointer samples and fading dabs
//! - [`surface`] - Drawing surface trait and a CPU raster implementation
//! - [`gate`] - Exclusion selectors, the lock gate and deferred timers
//! - [`random`] - Injectable jitter source
//! - [`renderer`] - The [`AmbientRenderer`] tying it all together

pub mod brush;
pub mod color;
pub mod constants;
pub mod error;
pub mod gate;
pub mod random;
pub mod renderer;
pub mod surface;
pub mod types;

pub use brush::*;
pub use color::{ColorDrift, Hsv};
pub use constants::*;
pub use error::PainterError;
pub use gate::*;
pub use random::*;
pub use renderer::*;
pub use surface::*;
pub use types::*;
