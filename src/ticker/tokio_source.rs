//! Tick source backed by the tokio timer

use std::{sync::Mutex, time::Duration};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, warn};

use super::{OnFinish, OnTick, TickSource};

/// Runs each countdown as a spawned task on a tokio runtime.
///
/// Remaining time is measured from the scheduled tick instant rather than the
/// wake-up time, so ticks land on whole intervals unless the runtime falls far
/// enough behind to skip one.
#[derive(Debug)]
pub struct TokioTickSource {
    runtime: Handle,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl TokioTickSource {
    /// Create a tick source bound to the current runtime.
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new() -> Self {
        Self::with_handle(Handle::current())
    }

    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            task: Mutex::new(None),
        }
    }

    /// Whether a countdown task is currently alive
    pub fn is_active(&self) -> bool {
        self.task
            .lock()
            .map(|task| task.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    fn replace_task(&self, next: Option<JoinHandle<()>>) {
        match self.task.lock() {
            Ok(mut task) => {
                if let Some(previous) = task.take() {
                    previous.abort();
                }
                *task = next;
            }
            Err(e) => {
                warn!("Failed to lock tick task: {}", e);
                if let Some(handle) = next {
                    handle.abort();
                }
            }
        }
    }
}

impl Default for TokioTickSource {
    /// Same as [`TokioTickSource::new`]; panics outside a tokio runtime.
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for TokioTickSource {
    fn schedule(&self, duration_ms: u64, interval_ms: u64, on_tick: OnTick, on_finish: OnFinish) {
        let period = Duration::from_millis(interval_ms.max(1));
        let duration = Duration::from_millis(duration_ms);

        debug!("Scheduling countdown of {}ms every {}ms", duration_ms, period.as_millis());

        let handle = self.runtime.spawn(async move {
            let start = Instant::now();
            let deadline = start + duration;

            let mut ticker = interval_at(start + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let scheduled_at = ticker.tick().await;
                let remaining = deadline.saturating_duration_since(scheduled_at);
                on_tick(remaining.as_millis() as u64);
                if remaining.is_zero() {
                    break;
                }
            }

            on_finish();
        });

        self.replace_task(Some(handle));
    }

    fn cancel(&self) {
        self.replace_task(None);
    }
}

impl Drop for TokioTickSource {
    fn drop(&mut self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }
}
