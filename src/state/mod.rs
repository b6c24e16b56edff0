//! State management module
//!
//! This module contains the shared daemon state wrapped around the session timer.

pub mod app_state;
pub mod celebration;

// Re-export main types
pub use app_state::{AppState, Session};
pub use celebration::{Celebration, CelebrationStep};
