//! Deterministic tick source driven by hand

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use super::{OnFinish, OnTick, TickSource};

struct Run {
    remaining_ms: u64,
    interval_ms: u64,
    on_tick: OnTick,
    on_finish: OnFinish,
}

/// A tick source that only fires when told to.
///
/// Each call to [`advance`](Self::advance) delivers one tick synchronously on
/// the calling thread, which lets a whole countdown run without waiting on a
/// clock.
#[derive(Default)]
pub struct ManualTickSource {
    run: Mutex<Option<Run>>,
    ticks_delivered: AtomicUsize,
    schedules: AtomicUsize,
    cancels: AtomicUsize,
}

impl ManualTickSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn run(&self) -> MutexGuard<'_, Option<Run>> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver the next tick of the active run.
    ///
    /// Returns false when nothing is scheduled. The tick that brings the
    /// remaining time to zero is followed by the finish callback.
    pub fn advance(&self) -> bool {
        let (remaining_ms, on_tick, on_finish) = {
            let mut guard = self.run();
            let Some(run) = guard.as_mut() else {
                return false;
            };

            run.remaining_ms = run.remaining_ms.saturating_sub(run.interval_ms.max(1));
            let remaining_ms = run.remaining_ms;
            let on_tick = run.on_tick.clone();
            let on_finish = if remaining_ms == 0 {
                guard.take().map(|run| run.on_finish)
            } else {
                None
            };
            (remaining_ms, on_tick, on_finish)
        };

        self.ticks_delivered.fetch_add(1, Ordering::SeqCst);
        on_tick(remaining_ms);
        if let Some(on_finish) = on_finish {
            on_finish();
        }
        true
    }

    /// Deliver `count` ticks, stopping early if the run ends
    pub fn advance_by(&self, count: usize) -> usize {
        (0..count).take_while(|_| self.advance()).count()
    }

    /// Drive the active run until it finishes; returns the ticks delivered
    pub fn run_to_completion(&self) -> usize {
        let mut delivered = 0;
        while self.advance() {
            delivered += 1;
        }
        delivered
    }

    pub fn is_scheduled(&self) -> bool {
        self.run().is_some()
    }

    pub fn remaining_ms(&self) -> Option<u64> {
        self.run().as_ref().map(|run| run.remaining_ms)
    }

    /// Total ticks delivered over the lifetime of this source
    pub fn ticks_delivered(&self) -> usize {
        self.ticks_delivered.load(Ordering::SeqCst)
    }

    pub fn schedule_count(&self) -> usize {
        self.schedules.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl TickSource for ManualTickSource {
    fn schedule(&self, duration_ms: u64, interval_ms: u64, on_tick: OnTick, on_finish: OnFinish) {
        self.schedules.fetch_add(1, Ordering::SeqCst);
        *self.run() = Some(Run {
            remaining_ms: duration_ms,
            interval_ms,
            on_tick,
            on_finish,
        });
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        self.run().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{atomic::AtomicBool, Arc};

    #[test]
    fn test_advance_without_schedule() {
        let source = ManualTickSource::new();
        assert!(!source.advance());
        assert_eq!(source.ticks_delivered(), 0);
    }

    #[test]
    fn test_run_reports_each_interval_then_finishes() {
        let source = ManualTickSource::new();
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let finished = Arc::new(AtomicBool::new(false));

        let sink = Arc::clone(&ticks);
        let flag = Arc::clone(&finished);
        source.schedule(
            3000,
            1000,
            Arc::new(move |remaining| sink.lock().unwrap().push(remaining)),
            Arc::new(move || flag.store(true, Ordering::SeqCst)),
        );

        assert_eq!(source.run_to_completion(), 3);
        assert_eq!(*ticks.lock().unwrap(), vec![2000, 1000, 0]);
        assert!(finished.load(Ordering::SeqCst));
        assert!(!source.is_scheduled());
    }

    #[test]
    fn test_cancel_drops_run() {
        let source = ManualTickSource::new();
        source.schedule(5000, 1000, Arc::new(|_| {}), Arc::new(|| {}));

        assert_eq!(source.advance_by(2), 2);
        assert_eq!(source.remaining_ms(), Some(3000));

        source.cancel();
        assert!(!source.advance());
        assert_eq!(source.ticks_delivered(), 2);
        assert_eq!(source.cancel_count(), 1);
    }
}
