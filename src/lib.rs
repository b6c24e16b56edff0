//! Pomodoro Server - A state-managed HTTP server driving a Pomodoro session timer
//!
//! This library provides the session timer state machine and the daemon
//! plumbing around it: a once-per-second ticker, completion celebrations
//! with auto-start, completion cues and an HTTP control surface.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use timer::{SessionTimer, TimerState};
pub use utils::signals::shutdown_signal;
