//! Completion cue hook

use super::TimerState;

/// Best-effort signal played when a phase completes.
///
/// Errors are reported back to the timer, which logs and discards them.
pub trait CompletionCue: Send {
    fn play(&self, completed: TimerState) -> Result<(), String>;
}
