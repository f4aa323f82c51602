//! Countdown controller: owns the timer state and drives the tick source

use std::sync::{Arc, Mutex};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info};

use crate::ticker::{OnFinish, OnTick, TickSource};
use super::{TimeOperator, TimeUnit, TimerState};

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Transitions pushed to event subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    Adjusted { unit: TimeUnit, operator: TimeOperator, formatted_time: String },
    Started { total_time_ms: u64 },
    Tick { remaining_ms: u64, progress: f32 },
    Finished,
    Cancelled { formatted_time: String },
}

#[derive(Debug)]
struct Inner {
    state: TimerState,
    /// Bumped on every start and cancel; callbacks of older runs are ignored
    run: u64,
}

#[derive(Debug)]
struct Shared {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<TimerState>,
    event_tx: broadcast::Sender<TimerEvent>,
}

impl Shared {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, String> {
        self.inner
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    fn publish(&self, state: &TimerState) {
        self.state_tx.send_if_modified(|current| {
            if *current == *state {
                false
            } else {
                *current = state.clone();
                true
            }
        });
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.receiver_count() > 0 {
            // Only fails when every receiver went away in between
            let _ = self.event_tx.send(event);
        }
    }

    fn on_tick(&self, run: u64, remaining_ms: u64) {
        let mut inner = match self.lock() {
            Ok(inner) => inner,
            Err(e) => {
                error!("Dropping tick: {}", e);
                return;
            }
        };
        if inner.run != run || !inner.state.is_running {
            debug!("Ignoring tick from stale run {}", run);
            return;
        }

        inner.state.apply_tick(remaining_ms);
        let snapshot = inner.state.clone();

        debug!("Tick: {} remaining ({}ms)", snapshot.formatted_time, remaining_ms);
        self.publish(&snapshot);
        self.emit(TimerEvent::Tick {
            remaining_ms,
            progress: snapshot.progress,
        });
    }

    fn on_finish(&self, run: u64) {
        let mut inner = match self.lock() {
            Ok(inner) => inner,
            Err(e) => {
                error!("Dropping finish: {}", e);
                return;
            }
        };
        if inner.run != run || !inner.state.is_running {
            debug!("Ignoring finish from stale run {}", run);
            return;
        }

        inner.state.finish();
        let snapshot = inner.state.clone();

        info!("Countdown finished");
        self.publish(&snapshot);
        self.emit(TimerEvent::Finished);
    }
}

/// Single countdown timer.
///
/// Every mutation and its notification happen under one lock, and tick
/// callbacks carry the run they were scheduled for. After
/// [`cancel`](Self::cancel) returns, no tick of the cancelled run can change
/// the state.
pub struct TimerController {
    shared: Arc<Shared>,
    source: Arc<dyn TickSource>,
    tick_interval_ms: u64,
}

impl TimerController {
    /// Create an idle controller with a zero duration
    pub fn new(source: Arc<dyn TickSource>) -> Self {
        Self::with_state(source, TimerState::new(), DEFAULT_TICK_INTERVAL_MS)
    }

    /// Create a controller from an initial state and tick interval.
    ///
    /// The state is forced idle; a countdown only starts through [`start`](Self::start).
    pub fn with_state(source: Arc<dyn TickSource>, mut state: TimerState, tick_interval_ms: u64) -> Self {
        state.halt();
        let (state_tx, _) = watch::channel(state.clone());
        let (event_tx, _) = broadcast::channel(100);

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner { state, run: 0 }),
                state_tx,
                event_tx,
            }),
            source,
            tick_interval_ms: tick_interval_ms.max(1),
        }
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Receive the full state after every change
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.shared.state_tx.subscribe()
    }

    /// Receive transition events
    pub fn events(&self) -> broadcast::Receiver<TimerEvent> {
        self.shared.event_tx.subscribe()
    }

    /// Get current timer state
    pub fn state(&self) -> Result<TimerState, String> {
        self.shared.lock().map(|inner| inner.state.clone())
    }

    pub fn is_running(&self) -> Result<bool, String> {
        self.shared.lock().map(|inner| inner.state.is_running)
    }

    /// Step one field of the configured duration. Ignored while running.
    pub fn adjust(&self, unit: TimeUnit, operator: TimeOperator) -> Result<TimerState, String> {
        let mut inner = self.shared.lock()?;
        if !inner.state.adjust(unit, operator) {
            debug!("Ignoring {:?} {:?} while running", operator, unit);
            return Ok(inner.state.clone());
        }
        let snapshot = inner.state.clone();

        debug!("Adjusted {:?} {:?}: {}", unit, operator, snapshot.formatted_time);
        self.shared.publish(&snapshot);
        self.shared.emit(TimerEvent::Adjusted {
            unit,
            operator,
            formatted_time: snapshot.formatted_time.clone(),
        });
        Ok(snapshot)
    }

    /// Start counting down from the duration currently held in the fields.
    ///
    /// Does nothing on a zero duration. An active run is cancelled first and
    /// the new run starts from its remaining time.
    pub fn start(&self) -> Result<TimerState, String> {
        let mut inner = self.shared.lock()?;
        let total_time_ms = inner.state.configured_millis();
        if total_time_ms == 0 {
            debug!("Ignoring start with zero duration");
            return Ok(inner.state.clone());
        }

        if inner.state.is_running {
            info!("Restarting active countdown");
            self.source.cancel();
        }

        inner.run += 1;
        let run = inner.run;
        inner.state.begin(total_time_ms);

        let tick_shared = Arc::clone(&self.shared);
        let on_tick: OnTick = Arc::new(move |remaining_ms| tick_shared.on_tick(run, remaining_ms));
        let finish_shared = Arc::clone(&self.shared);
        let on_finish: OnFinish = Arc::new(move || finish_shared.on_finish(run));

        // Scheduled under the lock so a concurrent cancel cannot slip in between
        self.source.schedule(total_time_ms, self.tick_interval_ms, on_tick, on_finish);
        let snapshot = inner.state.clone();

        info!("Countdown started: {} ({}ms)", snapshot.formatted_time, total_time_ms);
        self.shared.publish(&snapshot);
        self.shared.emit(TimerEvent::Started { total_time_ms });
        Ok(snapshot)
    }

    /// Stop the active countdown. Progress and fields are left as they are.
    pub fn cancel(&self) -> Result<TimerState, String> {
        let mut inner = self.shared.lock()?;
        if !inner.state.is_running {
            return Ok(inner.state.clone());
        }

        self.source.cancel();
        inner.run += 1;
        inner.state.halt();
        let snapshot = inner.state.clone();

        info!("Countdown cancelled at {}", snapshot.formatted_time);
        self.shared.publish(&snapshot);
        self.shared.emit(TimerEvent::Cancelled {
            formatted_time: snapshot.formatted_time.clone(),
        });
        Ok(snapshot)
    }

    /// Start when idle, cancel when running
    ///
    /// Ignored while the fields read 00:00:00, even during the last
    /// sub-interval of a run, so that run still reaches its finish.
    pub fn toggle(&self) -> Result<TimerState, String> {
        let inner = self.shared.lock()?;
        if inner.state.is_zero() {
            debug!("Ignoring toggle with zero duration");
            return Ok(inner.state.clone());
        }
        let running = inner.state.is_running;
        drop(inner);

        if running {
            self.cancel()
        } else {
            self.start()
        }
    }

    /// Tear down the session; no tick fires afterwards
    pub fn dispose(&self) {
        if let Err(e) = self.cancel() {
            error!("Failed to cancel countdown on dispose: {}", e);
            self.source.cancel();
        }
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for TimerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerController")
            .field("shared", &self.shared)
            .field("tick_interval_ms", &self.tick_interval_ms)
            .finish_non_exhaustive()
    }
}
