//! Session state shared with the HTTP layer

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::ticker::TickSource;
use super::{TimeOperator, TimeUnit, TimerController, TimerState};

/// Owns the timer controller for one session plus server metadata
#[derive(Debug)]
pub struct AppState {
    pub controller: TimerController,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last intent tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState around an existing controller
    pub fn new(controller: TimerController, port: u16, host: String) -> Self {
        Self {
            controller,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Build a session on the given tick source with an initial duration
    pub fn with_source(
        source: Arc<dyn TickSource>,
        initial: TimerState,
        tick_interval_ms: u64,
        port: u16,
        host: String,
    ) -> Self {
        Self::new(TimerController::with_state(source, initial, tick_interval_ms), port, host)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    pub fn adjust(&self, unit: TimeUnit, operator: TimeOperator) -> Result<TimerState, String> {
        self.record_action("adjust");
        self.controller.adjust(unit, operator)
    }

    pub fn start(&self) -> Result<TimerState, String> {
        self.record_action("start");
        self.controller.start()
    }

    pub fn cancel(&self) -> Result<TimerState, String> {
        self.record_action("cancel");
        self.controller.cancel()
    }

    pub fn toggle(&self) -> Result<TimerState, String> {
        self.record_action("toggle");
        self.controller.toggle()
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.controller.state()
    }

    /// End the session, cancelling any active countdown
    pub fn shutdown(&self) {
        info!("Disposing timer session");
        self.controller.dispose();
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last intent information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
