//! Continuous color drift toward palette anchors

use pigment_config::{earth_palette, AnchorColor, DriftConfig};
use tracing::{debug, warn};

use super::{shortest_hue_delta, Hsv};
use crate::random::JitterSource;

/// Live paint color easing toward one anchor of a fixed palette.
///
/// Hue always moves along the shorter arc, saturation and value move
/// linearly, so the color never jumps even when the anchor changes.
#[derive(Debug, Clone)]
pub struct ColorDrift {
    anchors: Vec<(String, Hsv)>,
    current: Hsv,
    target: usize,
    config: DriftConfig,
}

impl ColorDrift {
    /// Start on a random anchor, which is also the first target
    pub fn new(palette: &[AnchorColor], config: DriftConfig, rng: &mut dyn JitterSource) -> Self {
        let palette = if palette.is_empty() {
            warn!("ColorDrift: empty palette, falling back to earth tones");
            earth_palette()
        } else {
            palette.to_vec()
        };

        let anchors: Vec<(String, Hsv)> = palette
            .iter()
            .map(|a| (a.name.clone(), Hsv::from(a)))
            .collect();

        let target = rng.next_index(anchors.len());
        let current = anchors[target].1;
        debug!("ColorDrift: starting on '{}'", anchors[target].0);

        Self {
            anchors,
            current,
            target,
            config,
        }
    }

    /// The live color
    #[inline]
    pub fn current(&self) -> Hsv {
        self.current
    }

    /// The anchor currently eased toward
    #[inline]
    pub fn target(&self) -> Hsv {
        self.anchors[self.target].1
    }

    /// Palette index of the current target
    #[inline]
    pub fn target_index(&self) -> usize {
        self.target
    }

    /// Name of the current target anchor
    pub fn target_name(&self) -> &str {
        &self.anchors[self.target].0
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Point the drift at a specific anchor. Out-of-range indices are ignored.
    pub fn set_target(&mut self, index: usize) {
        if index < self.anchors.len() {
            self.target = index;
        }
    }

    /// Advance one easing step toward the target
    pub fn step(&mut self) {
        let ease = self.config.ease;
        let target = self.target();

        let dh = shortest_hue_delta(self.current.hue, target.hue);
        self.current.hue += dh * ease;
        self.current.saturation += (target.saturation - self.current.saturation) * ease;
        self.current.value += (target.value - self.current.value) * ease;
        self.current.normalize();
    }

    /// Pick a new random anchor, different from the current one when possible
    pub fn retarget(&mut self, rng: &mut dyn JitterSource) {
        let n = self.anchors.len();
        if n < 2 {
            return;
        }
        // Draw from the n-1 other anchors
        let offset = 1 + rng.next_index(n - 1);
        self.target = (self.target + offset) % n;
        debug!("ColorDrift: retargeting toward '{}'", self.target_name());
    }

    /// Roll the configured re-target chance. Returns true when the target changed.
    pub fn maybe_retarget(&mut self, rng: &mut dyn JitterSource) -> bool {
        if rng.chance(self.config.retarget_chance) {
            let before = self.target;
            self.retarget(rng);
            return self.target != before;
        }
        false
    }

    /// The current color with small per-mark scatter applied
    pub fn jittered(&self, rng: &mut dyn JitterSource) -> Hsv {
        let dh = rng.next_signed() * self.config.hue_jitter;
        let dv = rng.next_signed() * self.config.value_jitter;
        self.current.shifted(dh, 0.0, dv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SequenceJitter, XorShift64};

    fn two_tone() -> Vec<AnchorColor> {
        vec![
            AnchorColor::new("Red", 350.0, 0.8, 0.6),
            AnchorColor::new("Orange", 20.0, 0.4, 0.9),
        ]
    }

    #[test]
    fn test_starts_on_anchor() {
        let mut rng = SequenceJitter::constant(0.0);
        let drift = ColorDrift::new(&two_tone(), DriftConfig::default(), &mut rng);
        assert_eq!(drift.target_index(), 0);
        assert_eq!(drift.current(), drift.target());
        assert_eq!(drift.target_name(), "Red");
    }

    #[test]
    fn test_step_takes_short_way_round() {
        let mut rng = SequenceJitter::constant(0.0);
        let mut drift = ColorDrift::new(&two_tone(), DriftConfig::default(), &mut rng);
        drift.set_target(1);

        // 350 -> 20 is +30 the short way; one step at 0.06 moves 1.8 degrees
        drift.step();
        assert!((drift.current().hue - 351.8).abs() < 1e-3);
        assert!((drift.current().saturation - (0.8 - 0.4 * 0.06)).abs() < 1e-4);
        assert!((drift.current().value - (0.6 + 0.3 * 0.06)).abs() < 1e-4);
    }

    #[test]
    fn test_step_converges_without_overshoot() {
        let mut rng = SequenceJitter::constant(0.0);
        let mut drift = ColorDrift::new(&two_tone(), DriftConfig::default(), &mut rng);
        drift.set_target(1);

        let mut last_gap = shortest_hue_delta(drift.current().hue, 20.0).abs();
        for _ in 0..500 {
            drift.step();
            let gap = shortest_hue_delta(drift.current().hue, 20.0).abs();
            assert!(gap <= last_gap + 1e-4);
            last_gap = gap;
        }
        assert!(last_gap < 0.01);
    }

    #[test]
    fn test_retarget_changes_anchor() {
        let mut rng = XorShift64::new(3);
        let mut drift = ColorDrift::new(&two_tone(), DriftConfig::default(), &mut rng);
        let before = drift.target_index();
        drift.retarget(&mut rng);
        assert_ne!(drift.target_index(), before);
    }

    #[test]
    fn test_retarget_single_anchor_is_noop() {
        let palette = vec![AnchorColor::new("Only", 100.0, 0.5, 0.5)];
        let mut rng = XorShift64::new(3);
        let mut drift = ColorDrift::new(&palette, DriftConfig::default(), &mut rng);
        drift.retarget(&mut rng);
        assert_eq!(drift.target_index(), 0);
    }

    #[test]
    fn test_maybe_retarget_respects_chance() {
        let mut rng = SequenceJitter::constant(0.5);
        let mut drift = ColorDrift::new(&two_tone(), DriftConfig::default(), &mut rng);
        // 0.5 is never below the 0.02 chance
        for _ in 0..50 {
            assert!(!drift.maybe_retarget(&mut rng));
        }

        let mut always = SequenceJitter::constant(0.0);
        assert!(drift.maybe_retarget(&mut always));
    }

    #[test]
    fn test_jitter_is_bounded() {
        let config = DriftConfig::default();
        let mut rng = XorShift64::new(11);
        let drift = ColorDrift::new(&two_tone(), config.clone(), &mut rng);
        let base = drift.current();
        for _ in 0..1000 {
            let c = drift.jittered(&mut rng);
            assert!(shortest_hue_delta(base.hue, c.hue).abs() <= config.hue_jitter + 1e-3);
            assert!((c.value - base.value).abs() <= config.value_jitter + 1e-4);
            assert!((0.0..=1.0).contains(&c.value));
        }
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let mut rng = SequenceJitter::constant(0.0);
        let drift = ColorDrift::new(&[], DriftConfig::default(), &mut rng);
        assert_eq!(drift.anchor_count(), earth_palette().len());
    }
}
