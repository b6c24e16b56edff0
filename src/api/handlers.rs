//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    state::AppState,
    timer::{SettingsUpdate, TimerError, TimerSnapshot},
};
use super::responses::{ApiResponse, HealthResponse, SettingsResponse, StatusResponse};

type HandlerError = (StatusCode, Json<ApiResponse>);

/// Map a timer error onto an HTTP status with an error body
fn error_response(context: &str, e: TimerError) -> HandlerError {
    let status = match e {
        TimerError::OutOfRange { .. } => {
            warn!("{}: {}", context, e);
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TimerError::StateLock(_) => {
            error!("{}: {}", context, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ApiResponse::error(format!("{}: {}", context, e))))
}

fn command_response(
    result: Result<TimerSnapshot, TimerError>,
    message: &str,
    context: &str,
) -> Result<Json<ApiResponse>, HandlerError> {
    result
        .map(|snapshot| Json(ApiResponse::from_snapshot(message.to_string(), snapshot)))
        .map_err(|e| error_response(context, e))
}

/// Handle GET /timer - Current timer snapshot
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerSnapshot>, HandlerError> {
    state
        .get_snapshot()
        .map(Json)
        .map_err(|e| error_response("Failed to read timer", e))
}

/// Handle POST /timer/start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, HandlerError> {
    info!("Start endpoint called");
    command_response(state.start(), "Timer started", "Failed to start timer")
}

/// Handle POST /timer/pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, HandlerError> {
    info!("Pause endpoint called");
    command_response(state.pause(), "Timer paused", "Failed to pause timer")
}

/// Handle POST /timer/toggle - Start when paused, pause when running
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, HandlerError> {
    info!("Toggle endpoint called");
    command_response(state.toggle(), "Timer toggled", "Failed to toggle timer")
}

/// Handle POST /timer/stop - Stop and reset the timer
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, HandlerError> {
    info!("Stop endpoint called");
    command_response(state.stop(), "Timer stopped", "Failed to stop timer")
}

/// Handle POST /timer/skip - Complete the current phase now
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, HandlerError> {
    info!("Skip endpoint called");
    match state.skip() {
        Ok((Some(completion), snapshot)) => Ok(Json(ApiResponse::from_snapshot(
            format!("Skipped {}, next phase is {}", completion.completed, completion.next),
            snapshot,
        ))),
        Ok((None, snapshot)) => Ok(Json(ApiResponse::from_snapshot(
            "Timer is stopped, nothing to skip".to_string(),
            snapshot,
        ))),
        Err(e) => Err(error_response("Failed to skip phase", e)),
    }
}

/// Handle GET /settings - Current durations
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<SettingsResponse>, HandlerError> {
    let settings = state
        .get_settings()
        .map_err(|e| error_response("Failed to read settings", e))?;

    Ok(Json(SettingsResponse {
        settings,
        auto_start_delay_secs: state.auto_start_delay_secs,
    }))
}

/// Handle PUT /settings - Partial settings update
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<ApiResponse>, HandlerError> {
    info!("Settings endpoint called");
    if update.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("No settings provided".to_string())),
        ));
    }

    command_response(
        state.update_settings(update),
        "Settings updated",
        "Failed to update settings",
    )
}

/// Handle POST /celebration/dismiss - Close the celebration and start the next phase
pub async fn dismiss_celebration_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, HandlerError> {
    info!("Dismiss celebration endpoint called");
    match state.dismiss_celebration() {
        Ok(Some(snapshot)) => Ok(Json(ApiResponse::from_snapshot(
            "Celebration dismissed, next phase started".to_string(),
            snapshot,
        ))),
        Ok(None) => Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("No celebration in progress".to_string())),
        )),
        Err(e) => Err(error_response("Failed to dismiss celebration", e)),
    }
}

/// Handle GET /status - Timer, celebration and server information
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, HandlerError> {
    let timer = state
        .get_snapshot()
        .map_err(|e| error_response("Failed to read timer", e))?;
    let celebration = state
        .get_celebration()
        .map_err(|e| error_response("Failed to read celebration", e))?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        celebration,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
