//! Pomodoro Server - A state-managed HTTP server driving a Pomodoro session timer
//!
//! This is the main entry point for the pomodoro-server application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_server::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::{auto_start_task, session_ticker_task},
    timer::SessionTimer,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_server={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, work={}min, short_break={}min, long_break={}min, sessions_per_long_break={}, auto_start_delay={}s, cue={:?}",
          config.host, config.port, config.work, config.short_break, config.long_break,
          config.sessions_per_long_break, config.auto_start_delay, config.cue);

    // Create the session timer and application state
    let timer = SessionTimer::new(config.timer_settings()?)?.with_cue(config.completion_cue());
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        timer,
        config.auto_start_delay,
    ));

    // Start the background tasks that drive the timer
    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        session_ticker_task(ticker_state).await;
    });

    let auto_start_state = Arc::clone(&state);
    tokio::spawn(async move {
        auto_start_task(auto_start_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer               - Current timer snapshot");
    info!("  POST /timer/start         - Start or resume the countdown");
    info!("  POST /timer/pause         - Pause the countdown");
    info!("  POST /timer/toggle        - Start or pause");
    info!("  POST /timer/stop          - Stop and reset");
    info!("  POST /timer/skip          - Complete the current phase");
    info!("  GET  /settings            - Current durations");
    info!("  PUT  /settings            - Change durations");
    info!("  POST /celebration/dismiss - Start the next phase now");
    info!("  GET  /status              - Timer, celebration and server status");
    info!("  GET  /health              - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            match signal {
                Ok(signal) => info!("Shutdown signal {} received", signal),
                Err(e) => tracing::error!("Failed to listen for shutdown signals: {}", e),
            }
        }
    }

    if let Ok(snapshot) = state.get_snapshot() {
        info!("Completed {} work sessions this run", snapshot.completed_work_sessions);
    }
    info!("Server shutdown complete");
    Ok(())
}
