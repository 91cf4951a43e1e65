//! Cancellable deferred actions
//!
//! A [`Deferred`] is a one-shot deadline polled from the frame loop. Hosts
//! never need their own timeout handles: scheduling again simply moves the
//! deadline, cancelling clears it.

/// One-shot timer keyed on the renderer clock (milliseconds)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Deferred {
    deadline: Option<f64>,
}

impl Deferred {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Fire `delay_ms` after `now_ms`, replacing any pending deadline
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64) {
        self.deadline = Some(now_ms + delay_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[inline]
    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Returns true exactly once, on the first poll at or after the deadline
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
