//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::{TimerState, DEFAULT_TICK_INTERVAL_MS};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-timer")]
#[command(about = "A state-managed countdown timer with an HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial hours of the countdown (0-23)
    #[arg(long, default_value = "0")]
    pub hours: u32,

    /// Initial minutes of the countdown (0-59)
    #[arg(long, default_value = "0")]
    pub minutes: u32,

    /// Initial seconds of the countdown (0-59)
    #[arg(long, default_value = "0")]
    pub seconds: u32,

    /// Interval between ticks in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    pub tick_interval_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Idle timer state holding the configured duration, clamped into range
    pub fn initial_duration(&self) -> TimerState {
        TimerState::with_duration(self.hours, self.minutes, self.seconds)
    }
}
