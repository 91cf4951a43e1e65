//! Gesture gating: which pointer-downs may start a stroke
//!
//! - [`exclusion`] - selector matching against the element under the pointer
//! - [`deferred`] - schedule/cancel timers driven by frame time
//! - [`lock`] - long-press unlock and inactivity relock

pub mod deferred;
pub mod exclusion;
pub mod lock;

pub use deferred::Deferred;
pub use exclusion::{ElementInfo, ExclusionPredicate, ExclusionSet, SelectorError, TargetPath};
pub use lock::{LockGate, LockState};
