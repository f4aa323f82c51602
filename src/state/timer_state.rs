//! Timer state structure and transition rules

use serde::{Deserialize, Serialize};

pub const MSECS_IN_SEC: u64 = 1000;
pub const SECS_IN_MINUTE: u64 = 60;
pub const MINUTES_IN_HOUR: u64 = 60;

pub const MAX_HOURS: u32 = 23;
pub const MAX_MINUTES: u32 = 59;
pub const MAX_SECONDS: u32 = 59;

/// Which field of the configured duration an adjustment targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeUnit {
    Hour,
    Min,
    Sec,
}

impl TimeUnit {
    /// Upper bound of the field this unit addresses
    pub fn max(self) -> u32 {
        match self {
            TimeUnit::Hour => MAX_HOURS,
            TimeUnit::Min => MAX_MINUTES,
            TimeUnit::Sec => MAX_SECONDS,
        }
    }
}

/// Direction of an adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeOperator {
    Increase,
    Decrease,
}

impl TimeOperator {
    fn apply(self, value: u32) -> u32 {
        match self {
            TimeOperator::Increase => value.saturating_add(1),
            TimeOperator::Decrease => value.saturating_sub(1),
        }
    }
}

/// Hour/minute/second breakdown of a millisecond count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HmsParts {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl HmsParts {
    /// Split a millisecond count. Hours are not wrapped.
    pub fn from_millis(millis: u64) -> Self {
        let total_secs = millis / MSECS_IN_SEC;
        Self {
            hours: (total_secs / SECS_IN_MINUTE / MINUTES_IN_HOUR) as u32,
            minutes: (total_secs / SECS_IN_MINUTE % MINUTES_IN_HOUR) as u32,
            seconds: (total_secs % SECS_IN_MINUTE) as u32,
        }
    }

    pub fn to_millis(self) -> u64 {
        ((u64::from(self.hours) * MINUTES_IN_HOUR + u64::from(self.minutes)) * SECS_IN_MINUTE
            + u64::from(self.seconds))
            * MSECS_IN_SEC
    }
}

/// Format as zero-padded `HH:MM:SS`
pub fn format_hms(hours: u32, minutes: u32, seconds: u32) -> String {
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Countdown state observed by the presentation layer.
///
/// `hours`, `minutes` and `seconds` hold the configured duration while idle
/// and the live remaining time while running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub is_running: bool,
    /// Fraction of `total_time_ms` remaining
    pub progress: f32,
    /// Configured duration captured at start
    pub total_time_ms: u64,
    pub formatted_time: String,
}

impl TimerState {
    /// Create an idle state with a zero duration
    pub fn new() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 0,
            is_running: false,
            progress: 1.0,
            total_time_ms: 0,
            formatted_time: format_hms(0, 0, 0),
        }
    }

    /// Create an idle state configured to the given duration, clamped into range
    pub fn with_duration(hours: u32, minutes: u32, seconds: u32) -> Self {
        let mut state = Self::new();
        state.hours = hours.min(MAX_HOURS);
        state.minutes = minutes.min(MAX_MINUTES);
        state.seconds = seconds.min(MAX_SECONDS);
        state.refresh_formatted();
        state
    }

    pub fn parts(&self) -> HmsParts {
        HmsParts {
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
        }
    }

    /// Duration currently held by the h/m/s fields, in milliseconds
    pub fn configured_millis(&self) -> u64 {
        self.parts().to_millis()
    }

    pub fn is_zero(&self) -> bool {
        self.configured_millis() == 0
    }

    /// Step one field by one and saturate it into its bound.
    ///
    /// Returns false without touching anything while a countdown is running.
    pub fn adjust(&mut self, unit: TimeUnit, operator: TimeOperator) -> bool {
        if self.is_running {
            return false;
        }

        let field = match unit {
            TimeUnit::Hour => &mut self.hours,
            TimeUnit::Min => &mut self.minutes,
            TimeUnit::Sec => &mut self.seconds,
        };
        *field = operator.apply(*field).min(unit.max());

        self.refresh_formatted();
        true
    }

    /// Enter the running state for a fresh run of `total_time_ms`
    pub fn begin(&mut self, total_time_ms: u64) {
        self.total_time_ms = total_time_ms;
        self.is_running = true;
    }

    /// Recompute fields, progress and display from the remaining time
    pub fn apply_tick(&mut self, remaining_ms: u64) {
        let parts = HmsParts::from_millis(remaining_ms);

        if parts.seconds != self.seconds {
            self.seconds = parts.seconds;
        }
        if parts.minutes != self.minutes {
            self.minutes = parts.minutes;
        }
        if parts.hours != self.hours {
            self.hours = parts.hours;
        }

        if self.total_time_ms > 0 {
            self.progress = remaining_ms as f32 / self.total_time_ms as f32;
        }
        self.refresh_formatted();
    }

    /// Natural completion. Fields keep their last ticked values.
    pub fn finish(&mut self) {
        self.progress = 1.0;
        self.is_running = false;
    }

    /// Stop without touching progress or fields
    pub fn halt(&mut self) {
        self.is_running = false;
    }

    fn refresh_formatted(&mut self) {
        self.formatted_time = format_hms(self.hours, self.minutes, self.seconds);
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNITS: [TimeUnit; 3] = [TimeUnit::Hour, TimeUnit::Min, TimeUnit::Sec];
    const OPERATORS: [TimeOperator; 2] = [TimeOperator::Increase, TimeOperator::Decrease];

    #[test]
    fn test_new_state_is_idle_and_full() {
        let state = TimerState::new();
        assert!(!state.is_running);
        assert_eq!(state.progress, 1.0);
        assert_eq!(state.formatted_time, "00:00:00");
        assert!(state.is_zero());
    }

    #[test]
    fn test_adjust_stays_in_bounds() {
        for unit in UNITS {
            for operator in OPERATORS {
                let mut state = TimerState::new();
                for _ in 0..100 {
                    state.adjust(unit, operator);
                    assert!(state.hours <= MAX_HOURS);
                    assert!(state.minutes <= MAX_MINUTES);
                    assert!(state.seconds <= MAX_SECONDS);
                }
            }
        }
    }

    #[test]
    fn test_adjust_saturates_at_max() {
        let mut state = TimerState::with_duration(23, 59, 59);
        state.adjust(TimeUnit::Hour, TimeOperator::Increase);
        state.adjust(TimeUnit::Min, TimeOperator::Increase);
        state.adjust(TimeUnit::Sec, TimeOperator::Increase);
        assert_eq!(state.parts(), HmsParts { hours: 23, minutes: 59, seconds: 59 });
        assert_eq!(state.formatted_time, "23:59:59");
    }

    #[test]
    fn test_adjust_does_not_borrow_or_carry() {
        let mut state = TimerState::with_duration(0, 1, 0);

        state.adjust(TimeUnit::Sec, TimeOperator::Decrease);
        assert_eq!(state.parts(), HmsParts { hours: 0, minutes: 1, seconds: 0 });

        state.adjust(TimeUnit::Sec, TimeOperator::Increase);
        assert_eq!(state.parts(), HmsParts { hours: 0, minutes: 1, seconds: 1 });
        assert_eq!(state.formatted_time, "00:01:01");
    }

    #[test]
    fn test_adjust_ignored_while_running() {
        let mut state = TimerState::with_duration(0, 0, 5);
        state.begin(5000);
        let before = state.clone();

        assert!(!state.adjust(TimeUnit::Sec, TimeOperator::Increase));
        assert_eq!(state, before);
    }

    #[test]
    fn test_adjust_leaves_progress_alone() {
        let mut state = TimerState::with_duration(0, 0, 10);
        state.begin(10_000);
        state.apply_tick(4000);
        state.halt();

        state.adjust(TimeUnit::Min, TimeOperator::Increase);
        assert_eq!(state.progress, 0.4);
        assert_eq!(state.total_time_ms, 10_000);
    }

    #[test]
    fn test_with_duration_clamps() {
        let state = TimerState::with_duration(99, 75, 60);
        assert_eq!(state.parts(), HmsParts { hours: 23, minutes: 59, seconds: 59 });
    }

    #[test]
    fn test_hms_from_millis() {
        assert_eq!(
            HmsParts::from_millis(3_723_999),
            HmsParts { hours: 1, minutes: 2, seconds: 3 }
        );
        assert_eq!(HmsParts::from_millis(999), HmsParts { hours: 0, minutes: 0, seconds: 0 });
        // hours are not wrapped
        assert_eq!(HmsParts::from_millis(30 * 3_600_000).hours, 30);
    }

    #[test]
    fn test_configured_millis() {
        let state = TimerState::with_duration(1, 2, 3);
        assert_eq!(state.configured_millis(), ((60 + 2) * 60 + 3) * 1000);
    }

    #[test]
    fn test_apply_tick_updates_display_and_progress() {
        let mut state = TimerState::with_duration(0, 1, 30);
        state.begin(90_000);
        state.apply_tick(89_000);

        assert_eq!(state.parts(), HmsParts { hours: 0, minutes: 1, seconds: 29 });
        assert_eq!(state.formatted_time, "00:01:29");
        assert!((state.progress - 89.0 / 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_finish_resets_progress_to_full() {
        let mut state = TimerState::with_duration(0, 0, 2);
        state.begin(2000);
        state.apply_tick(1000);
        state.apply_tick(0);
        assert_eq!(state.progress, 0.0);

        state.finish();
        assert!(!state.is_running);
        assert_eq!(state.progress, 1.0);
        assert_eq!(state.formatted_time, "00:00:00");
    }

    #[test]
    fn test_units_serialize_uppercase() {
        assert_eq!(serde_json::to_string(&TimeUnit::Sec).unwrap(), "\"SEC\"");
        let op: TimeOperator = serde_json::from_str("\"DECREASE\"").unwrap();
        assert_eq!(op, TimeOperator::Decrease);
    }
}
