//! External side-effect module
//!
//! This module contains the completion cues that announce finished phases.

pub mod cues;

// Re-export main types
pub use cues::{CommandCue, SilentCue, TerminalBell};
