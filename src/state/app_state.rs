//! Main application state management

use std::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, trace};

use super::{Celebration, CelebrationStep};
use crate::timer::{
    Completion, SessionTimer, SettingsUpdate, TimerError, TimerEvent, TimerSettings, TimerSnapshot,
};

/// The session timer together with the celebration it may be showing.
///
/// Both live behind one lock so a command never observes one updated
/// without the other.
#[derive(Debug)]
pub struct Session {
    pub timer: SessionTimer,
    /// Celebration opened by the last completion, if still showing
    pub celebration: Option<Celebration>,
}

impl Session {
    /// Close the celebration, logging when one was showing
    fn close_celebration(&mut self) {
        if self.celebration.take().is_some() {
            debug!("Celebration closed");
        }
    }

    /// Open a celebration for a completion unless auto-start is disabled
    fn open_celebration(&mut self, completion: Completion, auto_start_delay_secs: u32) {
        if auto_start_delay_secs == 0 {
            return;
        }

        self.celebration = Some(Celebration::new(completion, auto_start_delay_secs));
        info!(
            "Celebrating {} completion, auto-starting {} in {}s",
            completion.completed, completion.next, auto_start_delay_secs
        );
    }
}

/// Main application state that owns the session timer and its notifications
#[derive(Debug)]
pub struct AppState {
    /// Timer and celebration, mutated together
    session: Mutex<Session>,
    /// Seconds a celebration lasts before the next phase starts; 0 disables
    pub auto_start_delay_secs: u32,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Every change and completion event raised by the timer
    pub event_tx: broadcast::Sender<TimerEvent>,
    /// Latest timer snapshot, republished after every mutation
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a new AppState around a configured timer
    pub fn new(
        port: u16,
        host: String,
        mut timer: SessionTimer,
        auto_start_delay_secs: u32,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);

        let forward = event_tx.clone();
        timer.subscribe(move |event| {
            if forward.send(*event).is_err() {
                trace!("No event subscribers for {:?}", event);
            }
        });

        let (snapshot_tx, snapshot_rx) = watch::channel(timer.snapshot());

        Self {
            session: Mutex::new(Session { timer, celebration: None }),
            auto_start_delay_secs,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            event_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Apply a change to the session and publish the resulting snapshot.
    ///
    /// The snapshot is published before the lock is released, so watchers
    /// always see snapshots in the order the changes were applied.
    /// `action` is recorded as the last action when present; ticks pass `None`.
    pub fn with_session<F, T>(
        &self,
        action: Option<&str>,
        apply: F,
    ) -> Result<(T, TimerSnapshot), TimerError>
    where
        F: FnOnce(&mut Session) -> T,
    {
        let mut session = self.lock_session()?;

        let output = apply(&mut *session);
        let snapshot = session.timer.snapshot();

        // Notify snapshot watchers (this drives the ticker)
        self.snapshot_tx.send_replace(snapshot.clone());
        drop(session); // Release the lock once watchers are up to date

        if let Some(action) = action {
            self.record_action(action);
        }

        Ok((output, snapshot))
    }

    /// Start or resume the countdown
    pub fn start(&self) -> Result<TimerSnapshot, TimerError> {
        info!("Starting timer");
        self.with_session(Some("start"), |session| {
            session.close_celebration();
            session.timer.start();
        })
        .map(|(_, snapshot)| snapshot)
    }

    /// Pause the countdown
    pub fn pause(&self) -> Result<TimerSnapshot, TimerError> {
        info!("Pausing timer");
        self.with_session(Some("pause"), |session| session.timer.pause())
            .map(|(_, snapshot)| snapshot)
    }

    /// Toggle between running and paused
    pub fn toggle(&self) -> Result<TimerSnapshot, TimerError> {
        info!("Toggling timer");
        self.with_session(Some("toggle"), |session| {
            session.close_celebration();
            session.timer.start_pause();
        })
        .map(|(_, snapshot)| snapshot)
    }

    /// Stop the timer and return to the initial condition
    pub fn stop(&self) -> Result<TimerSnapshot, TimerError> {
        info!("Stopping timer");
        self.with_session(Some("stop"), |session| {
            session.close_celebration();
            session.timer.stop();
        })
        .map(|(_, snapshot)| snapshot)
    }

    /// Complete the current phase now
    pub fn skip(&self) -> Result<(Option<Completion>, TimerSnapshot), TimerError> {
        info!("Skipping current phase");
        let delay = self.auto_start_delay_secs;
        self.with_session(Some("skip"), |session| {
            session.close_celebration();
            let completion = session.timer.skip();
            if let Some(completion) = completion {
                session.open_celebration(completion, delay);
            }
            completion
        })
    }

    /// Advance the countdown by one second
    pub fn tick(&self) -> Result<(Option<Completion>, TimerSnapshot), TimerError> {
        let delay = self.auto_start_delay_secs;
        let (completion, snapshot) = self.with_session(None, |session| {
            let completion = session.timer.tick();
            if let Some(completion) = completion {
                session.open_celebration(completion, delay);
            }
            completion
        })?;
        debug!("Tick: {} remaining in {}", snapshot.display_time, snapshot.state);
        Ok((completion, snapshot))
    }

    /// Apply a partial settings change; nothing changes if any value is invalid
    pub fn update_settings(&self, update: SettingsUpdate) -> Result<TimerSnapshot, TimerError> {
        info!("Updating settings: {:?}", update);
        let (result, snapshot) = self.with_session(Some("settings"), |session| {
            let merged = update.merge_into(session.timer.settings());
            session.timer.apply_settings(merged)
        })?;
        result?;
        Ok(snapshot)
    }

    /// Get current timer settings
    pub fn get_settings(&self) -> Result<TimerSettings, TimerError> {
        self.lock_session().map(|session| session.timer.settings())
    }

    /// Get current timer snapshot
    pub fn get_snapshot(&self) -> Result<TimerSnapshot, TimerError> {
        self.lock_session().map(|session| session.timer.snapshot())
    }

    /// Get the celebration currently showing, if any
    pub fn get_celebration(&self) -> Result<Option<Celebration>, TimerError> {
        self.lock_session().map(|session| session.celebration.clone())
    }

    /// Close the celebration and start the next phase right away.
    ///
    /// Returns `None` when no celebration is showing.
    pub fn dismiss_celebration(&self) -> Result<Option<TimerSnapshot>, TimerError> {
        let (dismissed, snapshot) = self.with_session(Some("dismiss"), |session| {
            if session.celebration.take().is_none() {
                return false;
            }
            session.timer.start();
            true
        })?;

        if dismissed {
            info!("Celebration dismissed, next phase started");
            Ok(Some(snapshot))
        } else {
            Ok(None)
        }
    }

    /// Count the celebration down by one second, auto-starting the next phase
    /// once it runs out
    pub fn advance_celebration(&self) -> Result<CelebrationStep, TimerError> {
        let (step, _) = self.with_session(None, |session| {
            let step = match session.celebration.as_mut() {
                None => CelebrationStep::Closed,
                Some(current) => {
                    if current.count_down() {
                        CelebrationStep::Elapsed
                    } else {
                        CelebrationStep::Pending(current.seconds_left)
                    }
                }
            };

            if step == CelebrationStep::Elapsed {
                session.celebration = None;
                session.timer.start();
            }
            step
        })?;

        if step == CelebrationStep::Elapsed {
            info!("Celebration countdown elapsed, next phase auto-started");
            self.record_action("auto-start");
        }

        Ok(step)
    }

    /// Subscribe to timer change and completion events
    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    /// Subscribe to timer snapshots
    pub fn subscribe_snapshots(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Session>, TimerError> {
        self.session.lock()
            .map_err(|e| TimerError::StateLock(e.to_string()))
    }
}
