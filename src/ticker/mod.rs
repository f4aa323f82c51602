//! Periodic tick sources
//!
//! The controller never touches a clock directly. It hands a duration, an
//! interval and two callbacks to a [`TickSource`], which reports the remaining
//! time on every interval and signals the end of the run.

pub mod manual;
pub mod tokio_source;

use std::sync::Arc;

/// Called with the remaining milliseconds of the current run
pub type OnTick = Arc<dyn Fn(u64) + Send + Sync>;
/// Called once when the remaining time reaches zero
pub type OnFinish = Arc<dyn Fn() + Send + Sync>;

/// A countdown primitive that fires at a fixed interval.
///
/// For a duration `D` and interval `I` a run reports `D-I, D-2I, ..., 0` and
/// then calls `on_finish`. Scheduling replaces any run already in progress.
pub trait TickSource: Send + Sync {
    fn schedule(&self, duration_ms: u64, interval_ms: u64, on_tick: OnTick, on_finish: OnFinish);

    /// Stop the current run. Safe to call when nothing is scheduled.
    fn cancel(&self);
}

// Re-export main types
pub use manual::ManualTickSource;
pub use tokio_source::TokioTickSource;
