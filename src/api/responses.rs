//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::Celebration,
    timer::{TimerSettings, TimerSnapshot, TimerState},
};

/// API response structure for timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: Option<TimerSnapshot>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: Option<TimerSnapshot>) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a response whose status follows the timer: running, paused or stopped
    pub fn from_snapshot(message: String, timer: TimerSnapshot) -> Self {
        let status = if timer.running {
            "running"
        } else if timer.state == TimerState::Stopped {
            "stopped"
        } else {
            "paused"
        };
        Self::new(status.to_string(), message, Some(timer))
    }

    /// Create an error response
    pub fn error(message: String) -> Self {
        Self::new("error".to_string(), message, None)
    }
}

/// Response for settings endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub settings: TimerSettings,
    pub auto_start_delay_secs: u32,
}

/// Enhanced status response with celebration and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub celebration: Option<Celebration>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
