//! Session timer core
//!
//! This module contains the Pomodoro countdown state machine. It is ticked by
//! an external scheduler and knows nothing about tokio or HTTP.

pub mod cue;
pub mod error;
pub mod events;
pub mod phase;
pub mod session_timer;
pub mod settings;

// Re-export main types
pub use cue::CompletionCue;
pub use error::TimerError;
pub use events::{Completion, Property, TimerEvent};
pub use phase::TimerState;
pub use session_timer::{SessionTimer, TimerSnapshot};
pub use settings::{SettingsUpdate, TimerSettings};
