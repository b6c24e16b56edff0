//! Change and completion notifications emitted by the session timer

use serde::{Deserialize, Serialize};

use super::TimerState;

/// An observable property of the session timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    State,
    Remaining,
    Running,
    CompletedWorkSessions,
    Settings,
}

/// A finished phase and the phase that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub completed: TimerState,
    pub next: TimerState,
}

/// Notification delivered to timer observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// An observable property changed value
    Changed(Property),
    /// A phase ended, either by reaching zero or by being skipped
    Completed(Completion),
}
