//! Completion celebration and its auto-start countdown

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Completion, TimerState};

/// Celebration shown after a phase completes, counting down to auto-start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Celebration {
    pub completed: TimerState,
    pub next: TimerState,
    pub message: String,
    pub sub_message: String,
    /// Glow colour for the completed phase
    pub accent_color: String,
    pub seconds_left: u32,
    pub started_at: DateTime<Utc>,
}

/// Result of advancing a celebration countdown by one second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelebrationStep {
    Pending(u32),
    Elapsed,
    Closed,
}

impl Celebration {
    /// Open a celebration for a completion with the given countdown
    pub fn new(completion: Completion, seconds: u32) -> Self {
        let (message, sub_message) = messages_for(completion.completed);
        let accent_color = if completion.completed.is_break() {
            "#10B981"
        } else {
            "#F97316"
        };

        Self {
            completed: completion.completed,
            next: completion.next,
            message: message.to_string(),
            sub_message: sub_message.to_string(),
            accent_color: accent_color.to_string(),
            seconds_left: seconds,
            started_at: Utc::now(),
        }
    }

    /// Count down one second, returning true once the countdown has run out
    pub fn count_down(&mut self) -> bool {
        self.seconds_left = self.seconds_left.saturating_sub(1);
        self.seconds_left == 0
    }
}

fn messages_for(completed: TimerState) -> (&'static str, &'static str) {
    match completed {
        TimerState::Work => (
            "Work Session Complete!",
            "Great focus! Time for a well-deserved break.",
        ),
        TimerState::ShortBreak => ("Break Complete!", "Feeling refreshed? Let's get back to work!"),
        TimerState::LongBreak => ("Long Break Complete!", "Recharged and ready to conquer more!"),
        TimerState::Stopped => ("Timer Complete!", "Ready for the next session?"),
    }
}
