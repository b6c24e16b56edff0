//! Pomodoro countdown state machine

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    settings::{
        check_minutes, check_range, MAX_SESSIONS_PER_LONG_BREAK, MIN_SESSIONS_PER_LONG_BREAK,
    },
    Completion, CompletionCue, Property, TimerError, TimerEvent, TimerSettings, TimerState,
};

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Callback registered with [`SessionTimer::subscribe`]
pub type Observer = Box<dyn Fn(&TimerEvent) + Send>;

/// Countdown timer cycling through work and break phases.
///
/// The timer never schedules itself: whoever owns it calls [`SessionTimer::tick`]
/// once per elapsed second while [`SessionTimer::is_running`] is true.
pub struct SessionTimer {
    state: TimerState,
    remaining: Duration,
    running: bool,
    completed_work_sessions: u32,
    settings: TimerSettings,
    cue: Option<Box<dyn CompletionCue>>,
    observers: Vec<Observer>,
}

/// Point-in-time view of a session timer, including derived display values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub state_label: String,
    pub state_color: String,
    pub remaining_seconds: u64,
    pub display_time: String,
    pub progress_percentage: f64,
    pub running: bool,
    pub button_label: String,
    pub completed_work_sessions: u32,
    pub settings: TimerSettings,
}

impl SessionTimer {
    /// Create a stopped timer with the given settings
    pub fn new(settings: TimerSettings) -> Result<Self, TimerError> {
        settings.validate()?;
        Ok(Self::stopped(settings))
    }

    /// Stopped timer showing a full work phase; `settings` must already be valid
    fn stopped(settings: TimerSettings) -> Self {
        Self {
            state: TimerState::Stopped,
            remaining: settings.duration_for(TimerState::Work),
            running: false,
            completed_work_sessions: 0,
            settings,
            cue: None,
            observers: Vec::new(),
        }
    }

    /// Attach the cue played on every completion
    pub fn with_cue(mut self, cue: Box<dyn CompletionCue>) -> Self {
        self.cue = Some(cue);
        self
    }

    /// Register a callback for change and completion notifications
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&TimerEvent) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    // --- Commands ---

    /// Start or resume the countdown. A stopped timer begins a fresh work phase.
    pub fn start(&mut self) {
        if self.state == TimerState::Stopped {
            self.enter(TimerState::Work);
        }
        self.set_running(true);
    }

    /// Suspend the countdown, keeping phase and remaining time
    pub fn pause(&mut self) {
        self.set_running(false);
    }

    /// Pause when running, start otherwise
    pub fn start_pause(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Return to the initial condition
    pub fn stop(&mut self) {
        self.set_running(false);
        self.set_state(TimerState::Stopped);
        self.set_remaining(self.settings.duration_for(TimerState::Work));
    }

    /// Complete the current phase immediately.
    ///
    /// Returns `None` while stopped, since there is no phase to complete.
    pub fn skip(&mut self) -> Option<Completion> {
        self.complete()
    }

    /// Advance the countdown by one second.
    ///
    /// A tick that finds the countdown already at zero completes the phase.
    pub fn tick(&mut self) -> Option<Completion> {
        if !self.running {
            return None;
        }

        if self.remaining.is_zero() {
            return self.complete();
        }

        self.set_remaining(self.remaining.saturating_sub(ONE_SECOND));
        None
    }

    // --- Configuration ---

    pub fn set_work_minutes(&mut self, minutes: u32) -> Result<(), TimerError> {
        check_minutes("work_minutes", minutes)?;
        self.update_settings(TimerSettings { work_minutes: minutes, ..self.settings });
        Ok(())
    }

    pub fn set_short_break_minutes(&mut self, minutes: u32) -> Result<(), TimerError> {
        check_minutes("short_break_minutes", minutes)?;
        self.update_settings(TimerSettings { short_break_minutes: minutes, ..self.settings });
        Ok(())
    }

    pub fn set_long_break_minutes(&mut self, minutes: u32) -> Result<(), TimerError> {
        check_minutes("long_break_minutes", minutes)?;
        self.update_settings(TimerSettings { long_break_minutes: minutes, ..self.settings });
        Ok(())
    }

    pub fn set_sessions_per_long_break(&mut self, sessions: u32) -> Result<(), TimerError> {
        check_range(
            "sessions_per_long_break",
            sessions,
            MIN_SESSIONS_PER_LONG_BREAK,
            MAX_SESSIONS_PER_LONG_BREAK,
        )?;
        self.update_settings(TimerSettings { sessions_per_long_break: sessions, ..self.settings });
        Ok(())
    }

    /// Replace all settings at once. Nothing changes if any field is invalid.
    pub fn apply_settings(&mut self, settings: TimerSettings) -> Result<(), TimerError> {
        settings.validate()?;
        self.update_settings(settings);
        Ok(())
    }

    // --- Queries ---

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    /// Configured duration of the current phase
    pub fn current_duration(&self) -> Duration {
        self.settings.duration_for(self.state)
    }

    /// Remaining time as `mm:ss`; minutes are not wrapped into hours
    pub fn display_time(&self) -> String {
        let secs = self.remaining.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Share of the current phase already elapsed, in percent
    pub fn progress_percentage(&self) -> f64 {
        let total = self.current_duration();
        if total.is_zero() {
            return 0.0;
        }

        let elapsed = total.saturating_sub(self.remaining);
        (elapsed.as_secs_f64() / total.as_secs_f64() * 100.0).clamp(0.0, 100.0)
    }

    pub fn state_label(&self) -> &'static str {
        self.state.label()
    }

    pub fn state_color(&self) -> &'static str {
        self.state.color()
    }

    /// Caption for the start/pause control
    pub fn button_label(&self) -> &'static str {
        if self.running { "Pause" } else { "Start" }
    }

    /// Capture every observable and derived value
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            state_label: self.state_label().to_string(),
            state_color: self.state_color().to_string(),
            remaining_seconds: self.remaining.as_secs(),
            display_time: self.display_time(),
            progress_percentage: self.progress_percentage(),
            running: self.running,
            button_label: self.button_label().to_string(),
            completed_work_sessions: self.completed_work_sessions,
            settings: self.settings,
        }
    }

    // --- Internals ---

    fn complete(&mut self) -> Option<Completion> {
        let completed = self.state;
        if completed == TimerState::Stopped {
            debug!("Ignoring completion request while stopped");
            return None;
        }

        self.set_running(false);
        self.play_cue(completed);

        let next = match completed {
            TimerState::Work => {
                self.completed_work_sessions += 1;
                self.notify(TimerEvent::Changed(Property::CompletedWorkSessions));

                if self.completed_work_sessions % self.settings.sessions_per_long_break == 0 {
                    TimerState::LongBreak
                } else {
                    TimerState::ShortBreak
                }
            }
            TimerState::ShortBreak | TimerState::LongBreak | TimerState::Stopped => {
                TimerState::Work
            }
        };
        self.enter(next);

        let completion = Completion { completed, next };
        info!(
            "Phase {} complete, next phase {} (completed work sessions: {})",
            completed, next, self.completed_work_sessions
        );
        self.notify(TimerEvent::Completed(completion));

        Some(completion)
    }

    fn play_cue(&self, completed: TimerState) {
        if let Some(cue) = &self.cue {
            if let Err(e) = cue.play(completed) {
                debug!("Completion cue failed: {}", e);
            }
        }
    }

    fn enter(&mut self, state: TimerState) {
        debug!("Entering phase {}", state);
        self.set_state(state);
        self.set_remaining(self.settings.duration_for(state));
    }

    fn update_settings(&mut self, settings: TimerSettings) {
        if settings == self.settings {
            return;
        }

        self.settings = settings;
        self.notify(TimerEvent::Changed(Property::Settings));

        // A stopped timer always shows a full work phase
        if self.state == TimerState::Stopped {
            self.set_remaining(settings.duration_for(TimerState::Work));
        }
    }

    fn set_state(&mut self, state: TimerState) {
        if self.state != state {
            self.state = state;
            self.notify(TimerEvent::Changed(Property::State));
        }
    }

    fn set_remaining(&mut self, remaining: Duration) {
        if self.remaining != remaining {
            self.remaining = remaining;
            self.notify(TimerEvent::Changed(Property::Remaining));
        }
    }

    fn set_running(&mut self, running: bool) {
        if self.running != running {
            self.running = running;
            self.notify(TimerEvent::Changed(Property::Running));
        }
    }

    fn notify(&self, event: TimerEvent) {
        for observer in &self.observers {
            observer(&event);
        }
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::stopped(TimerSettings::default())
    }
}

impl std::fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTimer")
            .field("state", &self.state)
            .field("remaining", &self.remaining)
            .field("running", &self.running)
            .field("completed_work_sessions", &self.completed_work_sessions)
            .field("settings", &self.settings)
            .field("has_cue", &self.cue.is_some())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use super::*;

    fn settings(work: u32, short: u32, long: u32, sessions: u32) -> TimerSettings {
        TimerSettings::new(work, short, long, sessions).unwrap()
    }

    /// Attach an observer that records every event
    fn record(timer: &mut SessionTimer) -> Arc<Mutex<Vec<TimerEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        timer.subscribe(move |event| sink.lock().unwrap().push(*event));
        events
    }

    fn completions(events: &Arc<Mutex<Vec<TimerEvent>>>) -> Vec<Completion> {
        events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                TimerEvent::Completed(completion) => Some(*completion),
                TimerEvent::Changed(_) => None,
            })
            .collect()
    }

    fn tick_n(timer: &mut SessionTimer, n: u64) -> Vec<Completion> {
        (0..n).filter_map(|_| timer.tick()).collect()
    }

    struct CountingCue(Arc<AtomicUsize>);

    impl CompletionCue for CountingCue {
        fn play(&self, _completed: TimerState) -> Result<(), String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct BrokenCue;

    impl CompletionCue for BrokenCue {
        fn play(&self, _completed: TimerState) -> Result<(), String> {
            Err("no audio device".to_string())
        }
    }

    #[test]
    fn starts_stopped_with_full_work_phase() {
        let timer = SessionTimer::default();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.remaining(), Duration::from_secs(25 * 60));
        assert!(!timer.is_running());
        assert_eq!(timer.completed_work_sessions(), 0);
        assert_eq!(timer.display_time(), "25:00");
        assert_eq!(timer.state_label(), "Ready to Focus");
        assert_eq!(timer.button_label(), "Start");
    }

    #[test]
    fn new_rejects_invalid_settings() {
        let invalid = TimerSettings { work_minutes: 0, ..TimerSettings::default() };
        assert!(SessionTimer::new(invalid).is_err());
    }

    #[test]
    fn start_enters_work_and_runs() {
        let mut timer = SessionTimer::default();
        timer.start();
        assert_eq!(timer.state(), TimerState::Work);
        assert!(timer.is_running());
        assert_eq!(timer.button_label(), "Pause");
        assert_eq!(timer.state_label(), "Focus Time");
    }

    #[test]
    fn ticking_whole_phase_reaches_zero_then_completes_once() {
        for minutes in [1, 2, 25, 120] {
            let mut timer = SessionTimer::new(settings(minutes, 5, 15, 4)).unwrap();
            let events = record(&mut timer);
            timer.start();

            let early = tick_n(&mut timer, u64::from(minutes) * 60);
            assert!(early.is_empty());
            assert_eq!(timer.remaining(), Duration::ZERO);
            assert_eq!(timer.display_time(), "00:00");
            assert_eq!(timer.progress_percentage(), 100.0);

            let completion = timer.tick();
            assert_eq!(
                completion,
                Some(Completion { completed: TimerState::Work, next: TimerState::ShortBreak })
            );
            assert_eq!(completions(&events).len(), 1);
            assert!(!timer.is_running());
        }
    }

    #[test]
    fn tick_is_ignored_while_paused() {
        let mut timer = SessionTimer::default();
        timer.start();
        timer.tick();
        timer.pause();
        let held = timer.remaining();

        assert_eq!(tick_n(&mut timer, 10).len(), 0);
        assert_eq!(timer.remaining(), held);
    }

    #[test]
    fn pause_then_start_resumes_from_held_value() {
        let mut timer = SessionTimer::default();
        timer.start();
        tick_n(&mut timer, 90);
        timer.pause();
        timer.pause();
        assert_eq!(timer.state(), TimerState::Work);
        assert_eq!(timer.remaining(), Duration::from_secs(25 * 60 - 90));

        timer.start();
        assert_eq!(timer.remaining(), Duration::from_secs(25 * 60 - 90));
        timer.tick();
        assert_eq!(timer.remaining(), Duration::from_secs(25 * 60 - 91));
    }

    #[test]
    fn start_pause_toggles() {
        let mut timer = SessionTimer::default();
        timer.start_pause();
        assert!(timer.is_running());
        timer.start_pause();
        assert!(!timer.is_running());
        assert_eq!(timer.state(), TimerState::Work);
    }

    #[test]
    fn skip_completes_regardless_of_remaining() {
        let mut timer = SessionTimer::new(settings(25, 7, 15, 4)).unwrap();
        let events = record(&mut timer);
        timer.start();
        tick_n(&mut timer, 3);

        let completion = timer.skip();
        assert_eq!(
            completion,
            Some(Completion { completed: TimerState::Work, next: TimerState::ShortBreak })
        );
        assert_eq!(completions(&events).len(), 1);
        assert_eq!(timer.remaining(), Duration::from_secs(7 * 60));
        assert_eq!(timer.completed_work_sessions(), 1);
        assert!(!timer.is_running());
    }

    #[test]
    fn skip_while_stopped_does_nothing() {
        let mut timer = SessionTimer::default();
        let events = record(&mut timer);
        assert_eq!(timer.skip(), None);
        assert!(events.lock().unwrap().is_empty());
        assert_eq!(timer.state(), TimerState::Stopped);
    }

    #[test]
    fn long_break_every_nth_work_session() {
        let mut timer = SessionTimer::new(settings(25, 5, 15, 3)).unwrap();
        timer.start();

        for n in 1..=9u32 {
            let work = timer.skip().unwrap();
            assert_eq!(work.completed, TimerState::Work);
            assert_eq!(timer.completed_work_sessions(), n);
            if n % 3 == 0 {
                assert_eq!(work.next, TimerState::LongBreak);
            } else {
                assert_eq!(work.next, TimerState::ShortBreak);
            }

            let rest = timer.skip().unwrap();
            assert_eq!(rest.next, TimerState::Work);
        }
    }

    #[test]
    fn stop_returns_to_initial_condition() {
        let mut timer = SessionTimer::default();
        timer.start();
        timer.skip();
        timer.start();
        tick_n(&mut timer, 42);

        timer.stop();
        timer.stop();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), Duration::from_secs(25 * 60));

        timer.start();
        assert_eq!(timer.state(), TimerState::Work);
        assert_eq!(timer.remaining(), Duration::from_secs(25 * 60));
    }

    /// Stop from the given position and check the fresh-start contract
    fn assert_stop_resets(mut timer: SessionTimer) {
        let work = timer.settings().duration_for(TimerState::Work);

        timer.stop();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), work);

        timer.start();
        assert_eq!(timer.state(), TimerState::Work);
        assert_eq!(timer.remaining(), work);
        assert!(timer.is_running());
    }

    #[test]
    fn stop_from_every_state_returns_to_initial_condition() {
        let config = settings(20, 3, 9, 2);

        // Stopped
        assert_stop_resets(SessionTimer::new(config).unwrap());

        // Paused work phase
        let mut paused = SessionTimer::new(config).unwrap();
        paused.start();
        tick_n(&mut paused, 75);
        paused.pause();
        assert_stop_resets(paused);

        // Running short break
        let mut short = SessionTimer::new(config).unwrap();
        short.start();
        short.skip();
        short.start();
        tick_n(&mut short, 10);
        assert_eq!(short.state(), TimerState::ShortBreak);
        assert_stop_resets(short);

        // Long break, not yet started
        let mut long = SessionTimer::new(config).unwrap();
        long.start();
        long.skip();
        long.skip();
        long.skip();
        assert_eq!(long.state(), TimerState::LongBreak);
        assert_stop_resets(long);
    }

    #[test]
    fn default_timer_matches_default_settings() {
        let timer = SessionTimer::default();
        assert_eq!(timer.settings(), TimerSettings::default());
        let validated = SessionTimer::new(TimerSettings::default()).unwrap();
        assert_eq!(timer.snapshot(), validated.snapshot());
    }

    #[test]
    fn stop_keeps_completed_session_count() {
        let mut timer = SessionTimer::default();
        timer.start();
        timer.skip();
        timer.stop();
        assert_eq!(timer.completed_work_sessions(), 1);
    }

    #[test]
    fn four_full_cycles_follow_pomodoro_order() {
        let mut timer = SessionTimer::new(settings(25, 5, 15, 4)).unwrap();
        let events = record(&mut timer);

        for _ in 0..8 {
            timer.start();
            let seconds = timer.remaining().as_secs();
            let done = tick_n(&mut timer, seconds + 1);
            assert_eq!(done.len(), 1);
        }

        let completed: Vec<TimerState> = completions(&events).iter().map(|c| c.completed).collect();
        assert_eq!(
            completed,
            vec![
                TimerState::Work,
                TimerState::ShortBreak,
                TimerState::Work,
                TimerState::ShortBreak,
                TimerState::Work,
                TimerState::ShortBreak,
                TimerState::Work,
                TimerState::LongBreak,
            ]
        );
        assert_eq!(completions(&events)[6].next, TimerState::LongBreak);
        assert_eq!(timer.completed_work_sessions(), 4);
        assert_eq!(timer.state(), TimerState::Work);
    }

    #[test]
    fn cue_plays_once_per_completion() {
        let plays = Arc::new(AtomicUsize::new(0));
        let mut timer = SessionTimer::default().with_cue(Box::new(CountingCue(Arc::clone(&plays))));
        timer.start();
        timer.skip();
        timer.skip();
        assert_eq!(plays.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failing_cue_does_not_block_transition() {
        let mut timer = SessionTimer::default().with_cue(Box::new(BrokenCue));
        timer.start();
        let completion = timer.skip();
        assert_eq!(completion.map(|c| c.next), Some(TimerState::ShortBreak));
        assert_eq!(timer.state(), TimerState::ShortBreak);
    }

    #[test]
    fn completion_event_follows_state_changes() {
        let mut timer = SessionTimer::default();
        timer.start();
        let events = record(&mut timer);
        timer.skip();

        let events = events.lock().unwrap();
        assert_eq!(
            events.last(),
            Some(&TimerEvent::Completed(Completion {
                completed: TimerState::Work,
                next: TimerState::ShortBreak,
            }))
        );
        assert!(events.contains(&TimerEvent::Changed(Property::Running)));
        assert!(events.contains(&TimerEvent::Changed(Property::State)));
        assert!(events.contains(&TimerEvent::Changed(Property::CompletedWorkSessions)));
    }

    #[test]
    fn changing_active_duration_keeps_remaining() {
        let mut timer = SessionTimer::default();
        timer.start();
        tick_n(&mut timer, 60);

        timer.set_work_minutes(50).unwrap();
        assert_eq!(timer.remaining(), Duration::from_secs(24 * 60));
        assert_eq!(timer.current_duration(), Duration::from_secs(50 * 60));
        assert!((timer.progress_percentage() - 52.0).abs() < 1e-9);

        // Shrinking below the remaining time pins progress at zero
        timer.set_work_minutes(10).unwrap();
        assert_eq!(timer.remaining(), Duration::from_secs(24 * 60));
        assert_eq!(timer.progress_percentage(), 0.0);
    }

    #[test]
    fn changing_work_duration_while_stopped_resets_remaining() {
        let mut timer = SessionTimer::default();
        let events = record(&mut timer);
        timer.set_work_minutes(45).unwrap();
        assert_eq!(timer.remaining(), Duration::from_secs(45 * 60));
        assert_eq!(timer.display_time(), "45:00");
        assert!(events.lock().unwrap().contains(&TimerEvent::Changed(Property::Settings)));
    }

    #[test]
    fn new_break_duration_applies_to_next_break() {
        let mut timer = SessionTimer::default();
        timer.start();
        timer.set_short_break_minutes(3).unwrap();
        timer.skip();
        assert_eq!(timer.remaining(), Duration::from_secs(3 * 60));
    }

    #[test]
    fn setters_reject_out_of_range_values() {
        let mut timer = SessionTimer::default();
        assert!(timer.set_work_minutes(0).is_err());
        assert!(timer.set_short_break_minutes(121).is_err());
        assert!(timer.set_long_break_minutes(0).is_err());
        assert!(timer.set_sessions_per_long_break(0).is_err());
        assert_eq!(timer.settings(), TimerSettings::default());
    }

    #[test]
    fn apply_settings_is_all_or_nothing() {
        let mut timer = SessionTimer::default();
        let bad = TimerSettings {
            work_minutes: 30,
            long_break_minutes: 500,
            ..TimerSettings::default()
        };
        assert!(timer.apply_settings(bad).is_err());
        assert_eq!(timer.settings(), TimerSettings::default());

        let good = settings(30, 10, 20, 2);
        timer.apply_settings(good).unwrap();
        assert_eq!(timer.settings(), good);
    }

    #[test]
    fn display_time_does_not_wrap_hours() {
        let timer = SessionTimer::new(settings(120, 5, 15, 4)).unwrap();
        assert_eq!(timer.display_time(), "120:00");
    }

    #[test]
    fn snapshot_reflects_derived_values() {
        let mut timer = SessionTimer::new(settings(2, 1, 1, 4)).unwrap();
        timer.start();
        tick_n(&mut timer, 30);

        let snapshot = timer.snapshot();
        assert_eq!(snapshot.state, TimerState::Work);
        assert_eq!(snapshot.remaining_seconds, 90);
        assert_eq!(snapshot.display_time, "01:30");
        assert_eq!(snapshot.progress_percentage, 25.0);
        assert_eq!(snapshot.state_color, "#E53E3E");
        assert_eq!(snapshot.button_label, "Pause");
        assert!(snapshot.running);
    }
}
