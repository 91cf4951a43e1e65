//! Painting lock: long-press unlock and inactivity relock

use pigment_config::LockMode;
use serde::Serialize;
use tracing::info;

use super::deferred::Deferred;
use crate::types::PointerSample;

/// Whether painting is currently allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    Locked,
    Unlocked,
}

/// Tracks the unlocked flag and the timers that flip it
#[derive(Debug, Clone)]
pub struct LockGate {
    mode: LockMode,
    relock_after_ms: Option<f64>,
    unlocked: bool,
    hold: Deferred,
    relock: Deferred,
}

impl LockGate {
    pub fn new(mode: LockMode, relock_after_ms: Option<f64>) -> Self {
        Self {
            mode,
            relock_after_ms,
            unlocked: matches!(mode, LockMode::AlwaysOn),
            hold: Deferred::new(),
            relock: Deferred::new(),
        }
    }

    #[inline]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn state(&self) -> LockState {
        if self.unlocked {
            LockState::Unlocked
        } else {
            LockState::Locked
        }
    }

    /// True while a long press is being held toward an unlock
    pub fn is_holding(&self) -> bool {
        self.hold.is_pending()
    }

    /// Pending inactivity relock deadline
    pub fn relock_deadline(&self) -> Option<f64> {
        self.relock.deadline()
    }

    /// A pointer went down anywhere. Starts the long-press hold when the
    /// painter is locked and the press lands in the top band.
    pub fn on_pointer_down(&mut self, sample: &PointerSample) {
        let LockMode::LongPress {
            hold_ms,
            top_margin,
        } = self.mode
        else {
            return;
        };

        if !self.unlocked && sample.position.y <= top_margin && !self.hold.is_pending() {
            self.hold.schedule(sample.time_ms, hold_ms);
        }
    }

    /// Pointer released or cancelled: an unfinished long press is abandoned
    pub fn on_pointer_release(&mut self) {
        self.hold.cancel();
    }

    /// Painting happened; push the inactivity relock back
    pub fn on_activity(&mut self, now_ms: f64) {
        if !self.unlocked || matches!(self.mode, LockMode::AlwaysOn) {
            return;
        }
        if let Some(delay) = self.relock_after_ms {
            self.relock.schedule(now_ms, delay);
        }
    }

    /// Unlock immediately. Returns true if the state changed.
    pub fn unlock(&mut self, now_ms: f64) -> bool {
        self.hold.cancel();
        let changed = !self.unlocked;
        self.unlocked = true;
        self.on_activity(now_ms);
        if changed {
            info!("Pigment unlocked");
        }
        changed
    }

    /// Lock immediately. Returns true if the state changed.
    pub fn relock(&mut self) -> bool {
        self.hold.cancel();
        self.relock.cancel();
        let changed = self.unlocked;
        self.unlocked = false;
        if changed {
            info!("Pigment locked");
        }
        changed
    }

    /// Run due timers. Returns the new state if it changed.
    pub fn poll(&mut self, now_ms: f64) -> Option<LockState> {
        if self.hold.poll(now_ms) && self.unlock(now_ms) {
            return Some(LockState::Unlocked);
        }
        if self.relock.poll(now_ms) && self.relock() {
            return Some(LockState::Locked);
        }
        None
    }
}
