//! Timer phases and their presentation values

use serde::{Deserialize, Serialize};

/// The phase a session timer is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Work,
    ShortBreak,
    LongBreak,
    Stopped,
}

impl TimerState {
    /// Human-readable label shown above the countdown
    pub fn label(&self) -> &'static str {
        match self {
            TimerState::Work => "Focus Time",
            TimerState::ShortBreak => "Short Break",
            TimerState::LongBreak => "Long Break",
            TimerState::Stopped => "Ready to Focus",
        }
    }

    /// Accent colour for the phase as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            TimerState::Work => "#E53E3E",
            TimerState::ShortBreak | TimerState::LongBreak => "#38B2AC",
            TimerState::Stopped => "#718096",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, TimerState::ShortBreak | TimerState::LongBreak)
    }
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimerState::Work => "work",
            TimerState::ShortBreak => "short_break",
            TimerState::LongBreak => "long_break",
            TimerState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
