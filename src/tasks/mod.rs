//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod state_observer;

// Re-export main functions
pub use state_observer::state_observer_task;
