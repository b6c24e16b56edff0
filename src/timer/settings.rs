//! Phase durations and long-break cadence

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{TimerError, TimerState};

pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 120;
pub const MIN_SESSIONS_PER_LONG_BREAK: u32 = 1;
pub const MAX_SESSIONS_PER_LONG_BREAK: u32 = 12;

/// Configured durations for each phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_per_long_break: u32,
}

impl TimerSettings {
    /// Build settings, rejecting any value outside its allowed range
    pub fn new(
        work_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
        sessions_per_long_break: u32,
    ) -> Result<Self, TimerError> {
        let settings = Self {
            work_minutes,
            short_break_minutes,
            long_break_minutes,
            sessions_per_long_break,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check every field against its range
    pub fn validate(&self) -> Result<(), TimerError> {
        check_minutes("work_minutes", self.work_minutes)?;
        check_minutes("short_break_minutes", self.short_break_minutes)?;
        check_minutes("long_break_minutes", self.long_break_minutes)?;
        check_range(
            "sessions_per_long_break",
            self.sessions_per_long_break,
            MIN_SESSIONS_PER_LONG_BREAK,
            MAX_SESSIONS_PER_LONG_BREAK,
        )
    }

    /// Configured duration of a phase. `Stopped` reports the work duration.
    pub fn duration_for(&self, state: TimerState) -> Duration {
        let minutes = match state {
            TimerState::Work | TimerState::Stopped => self.work_minutes,
            TimerState::ShortBreak => self.short_break_minutes,
            TimerState::LongBreak => self.long_break_minutes,
        };
        Duration::from_secs(u64::from(minutes) * 60)
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            sessions_per_long_break: 4,
        }
    }
}

/// Partial settings change; absent fields keep their current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub work_minutes: Option<u32>,
    pub short_break_minutes: Option<u32>,
    pub long_break_minutes: Option<u32>,
    pub sessions_per_long_break: Option<u32>,
}

impl SettingsUpdate {
    /// Merge this update over existing settings without validating
    pub fn merge_into(&self, current: TimerSettings) -> TimerSettings {
        TimerSettings {
            work_minutes: self.work_minutes.unwrap_or(current.work_minutes),
            short_break_minutes: self.short_break_minutes.unwrap_or(current.short_break_minutes),
            long_break_minutes: self.long_break_minutes.unwrap_or(current.long_break_minutes),
            sessions_per_long_break: self
                .sessions_per_long_break
                .unwrap_or(current.sessions_per_long_break),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub(crate) fn check_minutes(field: &'static str, value: u32) -> Result<(), TimerError> {
    check_range(field, value, MIN_MINUTES, MAX_MINUTES)
}

pub(crate) fn check_range(
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<(), TimerError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(TimerError::OutOfRange { field, value, min, max })
    }
}
