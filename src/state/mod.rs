//! State management module
//! 
//! This module contains the timer state, the controller that mutates it and
//! the session state shared with the HTTP layer.

pub mod timer_state;
pub mod controller;
pub mod app_state;

// Re-export main types
pub use timer_state::{format_hms, HmsParts, TimeOperator, TimeUnit, TimerState};
pub use controller::{TimerController, TimerEvent, DEFAULT_TICK_INTERVAL_MS};
pub use app_state::AppState;
