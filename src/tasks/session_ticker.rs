//! Session ticker background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Interval between countdown ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that ticks the session timer once per second while it runs
pub async fn session_ticker_task(state: Arc<AppState>) {
    info!("Starting session ticker task");

    let mut snapshot_rx = state.subscribe_snapshots();

    loop {
        // Wait until the timer is running
        if !snapshot_rx.borrow_and_update().running {
            if snapshot_rx.changed().await.is_err() {
                info!("Snapshot channel closed, stopping session ticker");
                return;
            }
            continue;
        }

        debug!("Timer running, starting tick interval");
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = state.tick() {
                        error!("Failed to tick timer: {}", e);
                    }
                }

                // Snapshot change - stop ticking once the timer is no longer running
                changed = snapshot_rx.changed() => {
                    if changed.is_err() {
                        info!("Snapshot channel closed, stopping session ticker");
                        return;
                    }
                    if !snapshot_rx.borrow_and_update().running {
                        debug!("Timer no longer running, stopping tick interval");
                        break;
                    }
                }
            }
        }
    }
}
