//! Celebration auto-start background task

use std::sync::Arc;
use tokio::{
    sync::broadcast::error::RecvError,
    time::{interval_at, Instant},
};
use tracing::{debug, error, info, warn};

use super::session_ticker::TICK_PERIOD;
use crate::{
    state::{AppState, CelebrationStep},
    timer::TimerEvent,
};

/// Background task that counts down each celebration and starts the next phase
pub async fn auto_start_task(state: Arc<AppState>) {
    info!("Starting auto-start task");

    let mut event_rx = state.subscribe_events();

    loop {
        match event_rx.recv().await {
            Ok(TimerEvent::Completed(completion)) => {
                debug!("Auto-start task received completion: {:?}", completion);
                run_celebration_countdown(&state).await;
            }
            Ok(TimerEvent::Changed(_)) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Auto-start task lagged behind by {} events", skipped);
                // A completion may have been among the skipped events
                if matches!(state.get_celebration(), Ok(Some(_))) {
                    run_celebration_countdown(&state).await;
                }
            }
            Err(RecvError::Closed) => {
                info!("Event channel closed, stopping auto-start task");
                return;
            }
        }
    }
}

async fn run_celebration_countdown(state: &AppState) {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

    loop {
        interval.tick().await;

        match state.advance_celebration() {
            Ok(CelebrationStep::Pending(seconds_left)) => {
                debug!("Auto-starting next phase in {}s", seconds_left);
            }
            Ok(CelebrationStep::Elapsed) => break,
            Ok(CelebrationStep::Closed) => {
                debug!("Celebration closed before countdown elapsed");
                break;
            }
            Err(e) => {
                error!("Failed to advance celebration: {}", e);
                break;
            }
        }
    }
}
