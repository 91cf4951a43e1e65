//! Stroke handling for the ambient renderer

use tracing::debug;

use super::AmbientRenderer;
use crate::brush::DabOutput;
use crate::surface::PaintSurface;
use crate::types::{Dab, PointerSample};

impl<S: PaintSurface> AmbientRenderer<S> {
    /// Begin a stroke at `sample`.
    ///
    /// Seeds one mark under the pointer at the minimum radius so a press
    /// without motion still shows paint. Restarts tracking if a stroke was
    /// already active.
    pub fn begin_stroke(&mut self, sample: PointerSample) {
        let seed = self.brush.begin_stroke(sample);
        let color = self.drift.current();
        self.push_mark(&seed, color, sample.time_ms);
    }

    /// Continue the active stroke with a new motion sample.
    ///
    /// Returns the number of marks emitted (0 when no stroke is active).
    pub fn extend_stroke(&mut self, sample: PointerSample) -> usize {
        if !self.brush.is_active() {
            debug!("extend_stroke: no active stroke, ignoring");
            return 0;
        }

        let dabs = self.brush.stroke_to(sample, self.rng.as_mut());

        self.drift.step();
        self.drift.maybe_retarget(self.rng.as_mut());

        for dab in &dabs {
            let color = self.drift.jittered(self.rng.as_mut());
            self.push_mark(dab, color, sample.time_ms);
        }
        dabs.len()
    }

    /// End the current stroke. Safe to call when no stroke is active.
    pub fn end_stroke(&mut self) {
        if self.brush.is_active() {
            debug!("end_stroke: {} live marks", self.marks.len());
        }
        self.brush.end_stroke();
    }

    fn push_mark(&mut self, dab: &DabOutput, color: crate::color::Hsv, born_ms: f64) {
        self.marks.push_back(Dab {
            center: dab.center,
            radius_x: dab.radius_x,
            radius_y: dab.radius_y,
            angle: dab.angle,
            color,
            base_alpha: dab.opacity,
            born_ms,
            highlight: dab.highlight,
        });
    }
}
