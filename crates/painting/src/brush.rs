//! Brush engine for dab generation
//!
//! Turns pointer samples into dab geometry. Pointer speed is smoothed with an
//! exponential moving average and, together with pressure, sets the brush
//! radius. Each motion sample scatters a few slightly different dabs so the
//! stroke reads as textured paint.

use std::f32::consts::PI;

use glam::Vec2;
use pigment_config::{BrushConfig, MAX_MARKS_PER_SAMPLE};
use tracing::debug;

use crate::constants::{
    HIGHLIGHT_RADIUS, HIGHLIGHT_SCATTER, MARK_ALPHA_FLOOR, MIN_SAMPLE_INTERVAL_MS,
};
use crate::random::JitterSource;
use crate::types::{Highlight, PointerSample};

/// Output from brush engine for a single dab
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DabOutput {
    /// Center in viewport CSS pixels
    pub center: Vec2,
    pub radius_x: f32,
    pub radius_y: f32,
    /// Rotation in radians
    pub angle: f32,
    /// Core opacity 0.0-1.0
    pub opacity: f32,
    pub highlight: Option<Highlight>,
}

/// Brush engine that generates dabs from input
pub struct BrushEngine {
    config: BrushConfig,
    /// Last sample (None if stroke not started)
    last: Option<PointerSample>,
    /// Exponentially smoothed speed in px/ms
    smoothed_speed: f32,
    /// Unsmoothed speed of the latest motion sample
    last_raw_speed: f32,
    /// Radius derived from the latest motion sample
    last_radius: f32,
}

impl BrushEngine {
    pub fn new(config: BrushConfig) -> Self {
        let smoothed_speed = config.initial_speed;
        let last_radius = config.min_radius;
        Self {
            config,
            last: None,
            smoothed_speed,
            last_raw_speed: 0.0,
            last_radius,
        }
    }

    pub fn config(&self) -> &BrushConfig {
        &self.config
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    #[inline]
    pub fn smoothed_speed(&self) -> f32 {
        self.smoothed_speed
    }

    #[inline]
    pub fn last_raw_speed(&self) -> f32 {
        self.last_raw_speed
    }

    #[inline]
    pub fn last_radius(&self) -> f32 {
        self.last_radius
    }

    /// Pressure actually used for sizing.
    /// Devices without pressure report 0 (or garbage); those get the default.
    pub fn effective_pressure(&self, reported: f32) -> f32 {
        if reported.is_finite() && reported > 0.0 {
            reported.min(1.0)
        } else {
            self.config.default_pressure.clamp(0.0, 1.0)
        }
    }

    /// Radius for a given smoothed speed and pressure, clamped to the brush range
    pub fn radius_for(&self, speed: f32, pressure: f32) -> f32 {
        let c = &self.config;
        let raw = c.min_radius + c.speed_gain * speed + c.pressure_gain * pressure;
        if raw.is_finite() {
            raw.clamp(c.min_radius, c.max_radius)
        } else {
            c.min_radius
        }
    }

    /// Core opacity for a pressure, before scatter
    pub fn opacity_for(&self, pressure: f32) -> f32 {
        (self.config.base_alpha + self.config.pressure_alpha * pressure).clamp(0.0, 1.0)
    }

    /// Start a new stroke and return the seed dab under the pointer
    pub fn begin_stroke(&mut self, sample: PointerSample) -> DabOutput {
        let pressure = self.effective_pressure(sample.pressure);
        self.last = Some(sample);
        self.smoothed_speed = self.config.initial_speed;
        self.last_raw_speed = 0.0;
        self.last_radius = self.config.min_radius;

        debug!(
            "BrushEngine::begin_stroke: seed dab at ({:.1}, {:.1}), pressure={:.2}",
            sample.position.x, sample.position.y, pressure
        );

        DabOutput {
            center: sample.position,
            radius_x: self.config.min_radius,
            radius_y: self.config.min_radius,
            angle: 0.0,
            opacity: self.opacity_for(pressure),
            highlight: None,
        }
    }

    /// Process a motion sample and generate dabs.
    ///
    /// Returns an empty list when no stroke is active.
    pub fn stroke_to(&mut self, sample: PointerSample, rng: &mut dyn JitterSource) -> Vec<DabOutput> {
        let Some(last) = self.last else {
            return Vec::new();
        };

        let dt = (sample.time_ms - last.time_ms).max(MIN_SAMPLE_INTERVAL_MS);
        let distance = sample.position.distance(last.position);
        let raw_speed = (distance as f64 / dt) as f32;

        let alpha = self.config.speed_smoothing;
        self.smoothed_speed += alpha * (raw_speed - self.smoothed_speed);
        if !self.smoothed_speed.is_finite() {
            self.smoothed_speed = self.config.initial_speed;
        }
        self.last_raw_speed = raw_speed;

        let pressure = self.effective_pressure(sample.pressure);
        let radius = self.radius_for(self.smoothed_speed, pressure);
        self.last_radius = radius;
        self.last = Some(sample);

        let dabs = self.scatter(sample.position, radius, pressure, rng);
        debug!(
            "BrushEngine::stroke_to: {} dabs at ({:.1}, {:.1}), speed={:.3} (raw {:.3}), radius={:.1}",
            dabs.len(),
            sample.position.x,
            sample.position.y,
            self.smoothed_speed,
            raw_speed,
            radius
        );
        dabs
    }

    /// Lay 1..=max dabs around `center` with small random variation
    fn scatter(
        &self,
        center: Vec2,
        radius: f32,
        pressure: f32,
        rng: &mut dyn JitterSource,
    ) -> Vec<DabOutput> {
        let c = &self.config;
        let count = 1 + rng.next_index(c.max_marks_per_sample.clamp(1, MAX_MARKS_PER_SAMPLE) as usize);
        let opacity = self.opacity_for(pressure);

        (0..count)
            .map(|_| {
                let offset = Vec2::new(rng.next_signed(), rng.next_signed()) * (c.position_jitter * radius);
                let rx = radius * (1.0 + rng.next_signed() * c.radius_variance);
                let ry = radius * (1.0 + rng.next_signed() * c.radius_variance);
                let center = center + offset;
                DabOutput {
                    center,
                    radius_x: rx.clamp(c.min_radius, c.max_radius),
                    radius_y: ry.clamp(c.min_radius, c.max_radius),
                    angle: rng.next_unit() * PI,
                    opacity: (opacity * rng.next_range(MARK_ALPHA_FLOOR, 1.0)).clamp(0.0, 1.0),
                    highlight: self.highlight_for(center, radius, pressure, rng),
                }
            })
            .collect()
    }

    /// Roll for a highlight fleck. Only firm presses can produce one.
    fn highlight_for(
        &self,
        center: Vec2,
        radius: f32,
        pressure: f32,
        rng: &mut dyn JitterSource,
    ) -> Option<Highlight> {
        let c = &self.config;
        if pressure <= c.highlight_pressure || !rng.chance(c.highlight_chance) {
            return None;
        }
        let offset = Vec2::new(rng.next_signed(), rng.next_signed()) * (HIGHLIGHT_SCATTER * radius);
        Some(Highlight {
            center: center + offset,
            radius: radius * HIGHLIGHT_RADIUS,
        })
    }

    /// End the current stroke
    pub fn end_stroke(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SequenceJitter, XorShift64};
    use proptest::prelude::*;

    fn engine() -> BrushEngine {
        BrushEngine::new(BrushConfig::default())
    }

    #[test]
    fn test_begin_stroke_seed_dab() {
        let mut engine = engine();
        let seed = engine.begin_stroke(PointerSample::new(100.0, 100.0, 0.5, 0.0));

        assert!(engine.is_active());
        assert_eq!(seed.center, Vec2::new(100.0, 100.0));
        assert_eq!(seed.radius_x, 10.0);
        assert_eq!(seed.radius_y, 10.0);
        assert!((seed.opacity - (0.26 + 0.35 * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_stroke_to_without_begin_is_empty() {
        let mut engine = engine();
        let mut rng = XorShift64::new(1);
        let dabs = engine.stroke_to(PointerSample::new(5.0, 5.0, 0.5, 16.0), &mut rng);
        assert!(dabs.is_empty());
        assert!(!engine.is_active());
    }

    #[test]
    fn test_raw_speed_between_samples() {
        let mut engine = engine();
        let mut rng = XorShift64::new(1);
        engine.begin_stroke(PointerSample::new(0.0, 0.0, 0.5, 0.0));
        engine.stroke_to(PointerSample::new(0.0, 0.0, 0.5, 100.0), &mut rng);
        engine.stroke_to(PointerSample::new(100.0, 0.0, 0.5, 116.0), &mut rng);
        assert!((engine.last_raw_speed() - 6.25).abs() < 1e-5);
    }

    #[test]
    fn test_first_sample_ema() {
        let config = BrushConfig {
            initial_speed: 0.5,
            ..Default::default()
        };
        let mut engine = BrushEngine::new(config);
        let mut rng = XorShift64::new(1);
        engine.begin_stroke(PointerSample::new(0.0, 0.0, 0.5, 0.0));
        engine.stroke_to(PointerSample::new(30.0, 40.0, 0.5, 10.0), &mut rng);

        // raw = 50px / 10ms = 5.0
        let expected = 0.5 + 0.35 * (5.0 - 0.5);
        assert!((engine.smoothed_speed() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_zero_interval_uses_minimum_step() {
        let mut engine = engine();
        let mut rng = XorShift64::new(1);
        engine.begin_stroke(PointerSample::new(0.0, 0.0, 0.5, 50.0));
        engine.stroke_to(PointerSample::new(3.0, 4.0, 0.5, 50.0), &mut rng);
        assert!((engine.last_raw_speed() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_emits_one_to_three_dabs() {
        let mut engine = engine();
        let mut rng = XorShift64::new(99);
        engine.begin_stroke(PointerSample::new(0.0, 0.0, 0.5, 0.0));
        for i in 1..200 {
            let dabs = engine.stroke_to(
                PointerSample::new(i as f32 * 3.0, 0.0, 0.5, i as f64 * 16.0),
                &mut rng,
            );
            assert!((1..=3).contains(&dabs.len()));
        }
    }

    #[test]
    fn test_unvalidated_mark_count_is_capped() {
        let config = BrushConfig {
            max_marks_per_sample: 2_000_000,
            ..Default::default()
        };
        let mut engine = BrushEngine::new(config);
        let mut rng = SequenceJitter::constant(0.999);
        engine.begin_stroke(PointerSample::new(0.0, 0.0, 0.5, 0.0));
        let dabs = engine.stroke_to(PointerSample::new(40.0, 0.0, 0.5, 16.0), &mut rng);
        assert_eq!(dabs.len(), MAX_MARKS_PER_SAMPLE as usize);
    }

    #[test]
    fn test_firm_press_can_add_highlight() {
        let config = BrushConfig {
            highlight_chance: 1.0,
            ..Default::default()
        };
        let mut engine = BrushEngine::new(config);
        let mut rng = XorShift64::new(11);
        engine.begin_stroke(PointerSample::new(0.0, 0.0, 0.9, 0.0));

        let firm = engine.stroke_to(PointerSample::new(30.0, 0.0, 0.9, 16.0), &mut rng);
        let radius = engine.last_radius();
        for dab in &firm {
            let highlight = dab.highlight.unwrap();
            assert!((highlight.radius - radius * 0.25).abs() < 1e-4);
            let offset = highlight.center - dab.center;
            assert!(offset.x.abs() <= 0.2 * radius + 1e-3);
            assert!(offset.y.abs() <= 0.2 * radius + 1e-3);
        }

        let soft = engine.stroke_to(PointerSample::new(60.0, 0.0, 0.5, 32.0), &mut rng);
        assert!(soft.iter().all(|d| d.highlight.is_none()));
    }

    #[test]
    fn test_highlight_chance_zero_never_highlights() {
        let config = BrushConfig {
            highlight_chance: 0.0,
            ..Default::default()
        };
        let mut engine = BrushEngine::new(config);
        let mut rng = XorShift64::new(3);
        engine.begin_stroke(PointerSample::new(0.0, 0.0, 1.0, 0.0));
        for i in 1..50 {
            let dabs = engine.stroke_to(
                PointerSample::new(i as f32 * 4.0, 0.0, 1.0, i as f64 * 16.0),
                &mut rng,
            );
            assert!(dabs.iter().all(|d| d.highlight.is_none()));
        }
    }

    #[test]
    fn test_scatter_stays_near_pointer() {
        let mut engine = engine();
        let mut rng = XorShift64::new(5);
        engine.begin_stroke(PointerSample::new(200.0, 200.0, 0.5, 0.0));
        let dabs = engine.stroke_to(PointerSample::new(220.0, 200.0, 0.5, 16.0), &mut rng);
        let radius = engine.last_radius();
        for dab in dabs {
            let offset = dab.center - Vec2::new(220.0, 200.0);
            assert!(offset.x.abs() <= 0.18 * radius + 1e-3);
            assert!(offset.y.abs() <= 0.18 * radius + 1e-3);
        }
    }

    #[test]
    fn test_missing_pressure_uses_default() {
        let engine = engine();
        assert_eq!(engine.effective_pressure(0.0), 0.5);
        assert_eq!(engine.effective_pressure(f32::NAN), 0.5);
        assert_eq!(engine.effective_pressure(0.8), 0.8);
        assert_eq!(engine.effective_pressure(3.0), 1.0);
    }

    #[test]
    fn test_end_stroke() {
        let mut engine = engine();
        let mut rng = SequenceJitter::constant(0.5);
        engine.begin_stroke(PointerSample::new(0.0, 0.0, 0.5, 0.0));
        engine.end_stroke();
        engine.end_stroke();
        assert!(!engine.is_active());
        assert!(engine.stroke_to(PointerSample::new(1.0, 1.0, 0.5, 1.0), &mut rng).is_empty());
    }

    proptest! {
        #[test]
        fn prop_radius_always_clamped(
            x in -1e7f32..1e7,
            y in -1e7f32..1e7,
            dt in 0.0f64..1000.0,
            pressure in proptest::num::f32::ANY,
            seed in 1u64..u64::MAX,
        ) {
            let mut engine = engine();
            let mut rng = XorShift64::new(seed);
            engine.begin_stroke(PointerSample::new(0.0, 0.0, 0.5, 0.0));
            let dabs = engine.stroke_to(PointerSample::new(x, y, pressure, dt), &mut rng);

            let r = engine.last_radius();
            prop_assert!((10.0..=72.0).contains(&r));
            for dab in dabs {
                prop_assert!((10.0..=72.0).contains(&dab.radius_x));
                prop_assert!((10.0..=72.0).contains(&dab.radius_y));
                prop_assert!((0.0..=1.0).contains(&dab.opacity));
            }
        }
    }
}
