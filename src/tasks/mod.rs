//! Background tasks module
//!
//! This module contains the tasks that drive the session timer alongside the HTTP server.

pub mod auto_start;
pub mod session_ticker;

// Re-export main functions
pub use auto_start::auto_start_task;
pub use session_ticker::session_ticker_task;
