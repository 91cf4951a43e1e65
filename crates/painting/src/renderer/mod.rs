//! Ambient stroke renderer
//!
//! This module ties the painter together:
//! - Input handling (pointer events from the host, gated by lock and exclusions)
//! - Brush engine (speed-driven dab generation)
//! - Color drift (the live paint color)
//! - Mark lifecycle (append-only, expiring)
//! - Per-frame drawing onto an injected [`PaintSurface`]
//!
//! All state lives in one [`AmbientRenderer`]; nothing is global, so several
//! independent painters can coexist.

mod frame;
mod input;
mod stroke;

use std::collections::VecDeque;

use pigment_config::{DisplayConfig, PainterConfig};
use serde::Serialize;
use tracing::info;

use crate::brush::BrushEngine;
use crate::color::ColorDrift;
use crate::error::PainterError;
use crate::gate::{ExclusionPredicate, ExclusionSet, LockGate, LockState};
use crate::random::{JitterSource, XorShift64};
use crate::surface::PaintSurface;
use crate::types::Dab;

/// What happened during one [`AmbientRenderer::render_frame`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    /// Marks painted this frame
    pub drawn: usize,
    /// Marks that reached their lifespan and were dropped
    pub expired: usize,
    /// Lock state change triggered by a timer, if any
    pub lock_change: Option<LockState>,
}

/// Result of offering a pointer-down to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerOutcome {
    /// A stroke began
    Started,
    /// Painting is locked; the host's own handling proceeds
    Locked,
    /// The target is excluded; the host's own handling proceeds
    Excluded,
}

/// Decorative paint layer driven by pointer input
pub struct AmbientRenderer<S: PaintSurface> {
    /// Drawing surface (None when the host could not create one)
    surface: Option<S>,
    config: PainterConfig,
    display: DisplayConfig,
    brush: BrushEngine,
    drift: ColorDrift,
    /// Live marks in creation order
    marks: VecDeque<Dab>,
    gate: LockGate,
    exclusion: Box<dyn ExclusionPredicate>,
    rng: Box<dyn JitterSource>,
}

impl<S: PaintSurface> AmbientRenderer<S> {
    /// Create a renderer with explicit collaborators.
    ///
    /// `config` is used as given; call [`PainterConfig::validate`] first if it
    /// comes from an untrusted source.
    pub fn new(
        surface: Option<S>,
        config: PainterConfig,
        exclusion: Box<dyn ExclusionPredicate>,
        mut rng: Box<dyn JitterSource>,
    ) -> Self {
        let drift = ColorDrift::new(&config.palette, config.drift.clone(), rng.as_mut());
        let brush = BrushEngine::new(config.brush.clone());
        let gate = LockGate::new(config.gate.lock, config.gate.relock_after_ms);

        if surface.is_none() {
            tracing::warn!("AmbientRenderer: no drawing surface, rendering disabled");
        }

        Self {
            surface,
            config,
            display: DisplayConfig::default(),
            brush,
            drift,
            marks: VecDeque::new(),
            gate,
            exclusion,
            rng,
        }
    }

    /// Validate `config`, parse its exclusion selectors and seed jitter from
    /// the platform entropy source
    pub fn from_config(surface: Option<S>, config: PainterConfig) -> Result<Self, PainterError> {
        Self::from_config_with_rng(surface, config, Box::new(XorShift64::from_entropy()))
    }

    /// Like [`AmbientRenderer::from_config`] with a caller-supplied jitter
    /// source, e.g. a fixed seed for reproducible output
    pub fn from_config_with_rng(
        surface: Option<S>,
        config: PainterConfig,
        rng: Box<dyn JitterSource>,
    ) -> Result<Self, PainterError> {
        config.validate()?;
        let exclusions = ExclusionSet::parse(&config.gate.exclusions)?;
        info!(
            "AmbientRenderer: {} anchors, {} exclusion selectors, lock={:?}",
            config.palette.len(),
            exclusions.len(),
            config.gate.lock
        );
        Ok(Self::new(surface, config, Box::new(exclusions), rng))
    }

    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    pub fn display(&self) -> DisplayConfig {
        self.display
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn brush(&self) -> &BrushEngine {
        &self.brush
    }

    pub fn drift(&self) -> &ColorDrift {
        &self.drift
    }

    /// Live marks, oldest first
    pub fn marks(&self) -> impl Iterator<Item = &Dab> {
        self.marks.iter()
    }

    pub fn mark_count(&self) -> usize {
        self.marks.len()
    }

    /// Check if a stroke is currently in progress
    pub fn is_stroking(&self) -> bool {
        self.brush.is_active()
    }

    pub fn is_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    pub fn lock_state(&self) -> LockState {
        self.gate.state()
    }
}
