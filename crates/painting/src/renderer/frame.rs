//! Per-frame drawing and viewport handling

use pigment_config::DisplayConfig;
use tracing::{debug, trace};

use super::{AmbientRenderer, FrameReport};
use crate::gate::LockState;
use crate::surface::{DabPaint, PaintSurface};

impl<S: PaintSurface> AmbientRenderer<S> {
    /// Draw one frame at `now_ms`.
    ///
    /// Runs due lock timers, drops expired marks, then repaints every
    /// surviving mark with its opacity scaled by remaining life. Must be
    /// called every display refresh, stroke or not, so marks keep fading.
    pub fn render_frame(&mut self, now_ms: f64) -> FrameReport {
        let lock_change = self.gate.poll(now_ms);
        if lock_change == Some(LockState::Locked) {
            self.end_stroke();
        }

        let lifespan = self.config.lifespan_ms;
        let before = self.marks.len();
        self.marks.retain(|dab| !dab.is_expired(now_ms, lifespan));
        let expired = before - self.marks.len();

        let Some(surface) = self.surface.as_mut() else {
            return FrameReport {
                drawn: 0,
                expired,
                lock_change,
            };
        };

        surface.clear();
        let mut drawn = 0;
        for dab in &self.marks {
            if let Some(alpha) = dab.alpha_at(now_ms, lifespan) {
                surface.fill_dab(&DabPaint::new(dab, alpha));
                drawn += 1;
            }
        }

        if expired > 0 {
            trace!("render_frame: drew {}, expired {}", drawn, expired);
        }

        FrameReport {
            drawn,
            expired,
            lock_change,
        }
    }

    /// Match a new viewport size. Existing marks keep their CSS positions.
    pub fn resize(&mut self, viewport: DisplayConfig) {
        let scale = viewport.clamped_scale();
        self.display = DisplayConfig { scale, ..viewport };
        debug!(
            "resize: {}x{} @ {:.2}x",
            viewport.width, viewport.height, scale
        );
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(viewport.width, viewport.height, scale);
        }
    }

    /// Drop every mark immediately
    pub fn clear_marks(&mut self) {
        self.marks.clear();
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
    }
}
