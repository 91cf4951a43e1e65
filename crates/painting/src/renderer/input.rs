//! Host pointer entry points and gesture gating

use tracing::debug;

use super::{AmbientRenderer, PointerOutcome};
use crate::gate::{LockState, TargetPath};
use crate::surface::PaintSurface;
use crate::types::{PointerKind, PointerSample};

impl<S: PaintSurface> AmbientRenderer<S> {
    /// A pointer went down over `target`.
    ///
    /// Starts a stroke unless painting is locked or the target is excluded.
    /// Rejected presses leave every piece of renderer state untouched apart
    /// from a possible long-press unlock hold.
    pub fn pointer_down(
        &mut self,
        sample: PointerSample,
        kind: PointerKind,
        target: &TargetPath,
    ) -> PointerOutcome {
        self.gate.on_pointer_down(&sample);

        if !self.gate.is_unlocked() {
            return PointerOutcome::Locked;
        }

        let bypass = kind == PointerKind::Pen && self.config.gate.pen_bypasses_exclusion;
        if !bypass && self.exclusion.excludes(target) {
            debug!("pointer_down: target excluded, leaving to host");
            return PointerOutcome::Excluded;
        }

        self.begin_stroke(sample);
        self.gate.on_activity(sample.time_ms);
        PointerOutcome::Started
    }

    /// Pointer motion. Returns the number of marks emitted.
    pub fn pointer_move(&mut self, sample: PointerSample) -> usize {
        if !self.brush.is_active() || !self.gate.is_unlocked() {
            return 0;
        }
        let emitted = self.extend_stroke(sample);
        self.gate.on_activity(sample.time_ms);
        emitted
    }

    /// Pointer released
    pub fn pointer_up(&mut self, now_ms: f64) {
        self.gate.on_pointer_release();
        if self.brush.is_active() {
            self.end_stroke();
            self.gate.on_activity(now_ms);
        }
    }

    /// Pointer cancelled by the platform (scroll takeover, palm rejection)
    pub fn pointer_cancel(&mut self, now_ms: f64) {
        self.pointer_up(now_ms);
    }

    /// Focus loss or any other interruption: the stroke must not dangle
    pub fn interrupt(&mut self) {
        self.gate.on_pointer_release();
        self.end_stroke();
    }

    /// Unlock painting now (pigment button, double click)
    pub fn unlock(&mut self, now_ms: f64) -> Option<LockState> {
        self.gate.unlock(now_ms).then_some(LockState::Unlocked)
    }

    /// Lock painting now (Escape). Ends any active stroke.
    pub fn relock(&mut self) -> Option<LockState> {
        self.end_stroke();
        self.gate.relock().then_some(LockState::Locked)
    }
}
