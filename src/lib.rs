//! Countdown Timer - A state-managed countdown with an HTTP control surface
//! 
//! This library provides a single adjustable hours/minutes/seconds countdown,
//! its progress fraction and formatted display, driven by an injectable tick
//! source and observable through watch and broadcast channels.

pub mod config;
pub mod state;
pub mod ticker;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerController, TimerEvent, TimerState};
pub use ticker::{ManualTickSource, TickSource, TokioTickSource};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
