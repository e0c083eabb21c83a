//! Focus / break countdown state machine
//!
//! The timer owns the settings and the countdown. Ticks arrive from a
//! [`Clock`] schedule and commands from the caller, one at a time. Output goes
//! to a [`TimerObserver`]: a render for every visible change and a completion
//! signal whenever an interval runs out.
//!
//! When an interval completes the next mode is loaded at full length but is
//! left stopped. Counting resumes only on an explicit [`IntervalTimer::start`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    clock::{Clock, ScheduleId, TickSender, TICK_PERIOD},
    settings::{SettingField, Settings},
    view::ViewModel,
};
use crate::{
    state::{Mode, TimerState},
    storage::SettingsStore,
};

/// Signal raised once per completed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Mode that just ran out
    pub finished: Mode,
    /// Mode loaded in its place
    pub next: Mode,
    pub completed_focus_cycles: u32,
}

/// Receives everything the timer wants shown
pub trait TimerObserver: Send {
    /// Remaining time or mode changed
    fn render(&self, view: &ViewModel);

    /// An interval reached zero
    fn interval_complete(&self, completion: &Completion);
}

pub struct IntervalTimer {
    settings: Settings,
    state: TimerState,
    active: Option<ScheduleId>,
    clock: Box<dyn Clock>,
    ticks: TickSender,
    store: Box<dyn SettingsStore>,
    observer: Box<dyn TimerObserver>,
}

impl IntervalTimer {
    /// Load persisted settings and prepare a stopped focus interval
    pub fn new(
        clock: Box<dyn Clock>,
        ticks: TickSender,
        store: Box<dyn SettingsStore>,
        observer: Box<dyn TimerObserver>,
    ) -> Self {
        let settings = load_settings(store.as_ref());
        info!(
            "Timer settings: focus={}min, break={}min, long={}min, cycles={}",
            settings.focus_minutes,
            settings.break_minutes,
            settings.long_break_minutes,
            settings.cycles_until_long_break
        );

        let timer = Self {
            state: TimerState::new(settings.duration_secs(Mode::Focus)),
            settings,
            active: None,
            clock,
            ticks,
            store,
            observer,
        };
        timer.render();
        timer
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn view(&self) -> ViewModel {
        ViewModel::from(&self.state)
    }

    /// Begin counting down. Does nothing if already running.
    ///
    /// Returns true if a new tick schedule was started.
    pub fn start(&mut self) -> bool {
        if self.active.is_some() {
            debug!("Start ignored, timer already running");
            return false;
        }

        let id = self
            .clock
            .schedule_repeating(TICK_PERIOD, self.ticks.clone());
        self.active = Some(id);
        self.state.running = true;
        info!(
            "Timer started: mode={}, remaining={}s",
            self.state.mode, self.state.remaining_seconds
        );
        self.render();
        true
    }

    /// Stop counting down, keeping the remaining time
    pub fn pause(&mut self) {
        if self.stop() {
            info!(
                "Timer paused: mode={}, remaining={}s",
                self.state.mode, self.state.remaining_seconds
            );
            self.render();
        }
    }

    /// Stop, clear the cycle count and refill the current mode
    pub fn reset(&mut self) {
        self.stop();
        self.state.completed_focus_cycles = 0;
        self.load_mode(self.state.mode);
        info!("Timer reset: mode={}", self.state.mode);
        self.render();
    }

    /// Stop, clear the cycle count and load `target` at full length
    pub fn switch_mode(&mut self, target: Mode) {
        self.stop();
        self.state.completed_focus_cycles = 0;
        self.load_mode(target);
        info!("Switched mode to {}", target);
        self.render();
    }

    /// Apply raw user input to one setting.
    ///
    /// The value is clamped (or defaulted), the whole record is persisted and
    /// the current mode is reloaded at its new length. Returns the stored value.
    pub fn update_setting(&mut self, field: SettingField, raw: &str) -> u32 {
        let value = self.settings.set(field, raw);
        info!("Setting {} changed to {} (input {:?})", field, value, raw);
        self.persist();

        self.stop();
        self.load_mode(self.state.mode);
        self.render();
        value
    }

    /// Apply one tick from `schedule`.
    ///
    /// Ticks from anything other than the active schedule are stale and are
    /// dropped.
    pub fn tick(&mut self, schedule: ScheduleId) {
        if self.active != Some(schedule) {
            debug!("Ignoring stale tick from schedule {}", schedule.value());
            return;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            self.render();
            return;
        }

        self.render();
        self.stop();
        self.complete_interval();
    }

    fn complete_interval(&mut self) {
        let finished = self.state.mode;
        let next = match finished {
            Mode::Focus => {
                self.state.completed_focus_cycles += 1;
                let cadence = self.settings.cycles_until_long_break.max(1);
                if self.state.completed_focus_cycles % cadence == 0 {
                    Mode::LongBreak
                } else {
                    Mode::Break
                }
            }
            Mode::Break | Mode::LongBreak => Mode::Focus,
        };

        let completion = Completion {
            finished,
            next,
            completed_focus_cycles: self.state.completed_focus_cycles,
        };
        info!(
            "Interval complete: {} -> {} (focus cycles: {})",
            finished, next, completion.completed_focus_cycles
        );

        self.load_mode(next);
        self.observer.interval_complete(&completion);
        self.render();
    }

    /// Cancel the active schedule. Returns true if one was running.
    fn stop(&mut self) -> bool {
        self.state.running = false;
        match self.active.take() {
            Some(id) => {
                self.clock.cancel(id);
                true
            }
            None => false,
        }
    }

    fn load_mode(&mut self, mode: Mode) {
        self.state.mode = mode;
        self.state.remaining_seconds = self.settings.duration_secs(mode);
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.settings) {
            warn!("Failed to persist settings, keeping them in memory only: {}", e);
        }
    }

    fn render(&self) {
        self.observer.render(&self.view());
    }
}

impl fmt::Debug for IntervalTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalTimer")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

fn load_settings(store: &dyn SettingsStore) -> Settings {
    match store.load() {
        Ok(Some(record)) => Settings::from_json(&record),
        Ok(None) => Settings::default(),
        Err(e) => {
            warn!("Failed to load settings, using defaults: {}", e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use serde_json::json;

    use super::*;
    use crate::{
        storage::MemoryStore,
        timer::clock::{tick_channel, ManualClock, TickReceiver},
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Render(ViewModel),
        Complete(Completion),
    }

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl Recorder {
        fn take(&self) -> Vec<Event> {
            std::mem::take(&mut *self.events.lock().unwrap())
        }

        fn completions(&self) -> Vec<Completion> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter_map(|e| match e {
                    Event::Complete(c) => Some(*c),
                    Event::Render(_) => None,
                })
                .collect()
        }
    }

    impl TimerObserver for Recorder {
        fn render(&self, view: &ViewModel) {
            self.events.lock().unwrap().push(Event::Render(view.clone()));
        }

        fn interval_complete(&self, completion: &Completion) {
            self.events.lock().unwrap().push(Event::Complete(*completion));
        }
    }

    struct Harness {
        timer: IntervalTimer,
        clock: ManualClock,
        ticks: TickReceiver,
        store: MemoryStore,
        recorder: Recorder,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_store(MemoryStore::new())
        }

        fn with_store(store: MemoryStore) -> Self {
            let clock = ManualClock::new();
            let recorder = Recorder::default();
            let (tx, ticks) = tick_channel();
            let timer = IntervalTimer::new(
                Box::new(clock.clone()),
                tx,
                Box::new(store.clone()),
                Box::new(recorder.clone()),
            );
            Self {
                timer,
                clock,
                ticks,
                store,
                recorder,
            }
        }

        /// Settings of one minute per mode keep the cycle tests short
        fn short() -> Self {
            Self::with_store(MemoryStore::with_record(
                json!({ "focus": 1, "break": 1, "long": 1, "cycles": 4 }),
            ))
        }

        fn pump(&mut self) {
            while let Ok(id) = self.ticks.try_recv() {
                self.timer.tick(id);
            }
        }

        fn advance(&mut self, seconds: u64) {
            for _ in 0..seconds {
                self.clock.advance(Duration::from_secs(1));
                self.pump();
            }
        }

        fn remaining(&self) -> u64 {
            self.timer.state().remaining_seconds
        }

        fn run_to_completion(&mut self) {
            self.timer.start();
            let remaining = self.remaining();
            self.advance(remaining);
        }
    }

    #[test]
    fn test_initial_state() {
        let h = Harness::new();
        let state = h.timer.state();
        assert_eq!(state.mode, Mode::Focus);
        assert_eq!(state.remaining_seconds, 25 * 60);
        assert!(!state.running);
        assert_eq!(state.completed_focus_cycles, 0);
        assert_eq!(h.clock.active_schedules(), 0);
        assert_eq!(
            h.recorder.take(),
            vec![Event::Render(h.timer.view())],
            "construction renders once"
        );
    }

    #[test]
    fn test_start_counts_down_once_per_second() {
        let mut h = Harness::new();
        assert!(h.timer.start());
        assert!(h.timer.state().running);

        h.advance(3);
        assert_eq!(h.remaining(), 25 * 60 - 3);
        assert_eq!(h.timer.view().time, "24:57");
    }

    #[test]
    fn test_start_twice_keeps_single_schedule() {
        let mut h = Harness::new();
        assert!(h.timer.start());
        assert!(!h.timer.start());
        assert_eq!(h.clock.active_schedules(), 1);

        h.advance(1);
        assert_eq!(h.remaining(), 25 * 60 - 1);
    }

    #[test]
    fn test_pause_then_start_resumes_exactly() {
        let mut h = Harness::new();
        h.timer.start();
        h.advance(10);
        h.timer.pause();
        assert!(!h.timer.state().running);
        let paused_at = h.remaining();

        h.advance(30);
        assert_eq!(h.remaining(), paused_at);

        h.timer.start();
        assert_eq!(h.remaining(), paused_at);
        h.advance(1);
        assert_eq!(h.remaining(), paused_at - 1);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut h = Harness::new();
        h.timer.pause();
        h.timer.start();
        h.timer.pause();
        h.timer.pause();
        assert!(!h.timer.state().running);
        assert_eq!(h.clock.active_schedules(), 0);
    }

    #[test]
    fn test_queued_tick_after_pause_is_dropped() {
        let mut h = Harness::new();
        h.timer.start();
        h.clock.advance(Duration::from_secs(2));
        h.timer.pause();

        h.pump();
        assert_eq!(h.remaining(), 25 * 60);
    }

    #[test]
    fn test_focus_completion_moves_to_break() {
        let mut h = Harness::short();
        h.recorder.take();

        h.run_to_completion();

        let state = h.timer.state();
        assert_eq!(state.mode, Mode::Break);
        assert_eq!(state.remaining_seconds, 60);
        assert!(!state.running);
        assert_eq!(state.completed_focus_cycles, 1);
        assert_eq!(h.clock.active_schedules(), 0);

        let events = h.recorder.take();
        let zero = events
            .iter()
            .position(|e| matches!(e, Event::Render(v) if v.time == "00:00"))
            .expect("renders 00:00");
        let complete = events
            .iter()
            .position(|e| matches!(e, Event::Complete(_)))
            .expect("completion emitted");
        assert!(zero < complete);
        assert_eq!(
            events[complete],
            Event::Complete(Completion {
                finished: Mode::Focus,
                next: Mode::Break,
                completed_focus_cycles: 1,
            })
        );
        assert!(
            matches!(events.last(), Some(Event::Render(v)) if v.mode == Mode::Break && v.time == "01:00")
        );
    }

    #[test]
    fn test_next_interval_waits_for_start() {
        let mut h = Harness::short();
        h.run_to_completion();

        h.advance(5);
        assert_eq!(h.remaining(), 60);
        assert_eq!(h.timer.state().mode, Mode::Break);
    }

    #[test]
    fn test_long_break_every_fourth_focus() {
        let mut h = Harness::short();
        let mut transitions = Vec::new();

        for _ in 0..4 {
            assert_eq!(h.timer.state().mode, Mode::Focus);
            h.run_to_completion();
            transitions.push(h.timer.state().mode);
            h.run_to_completion();
        }

        assert_eq!(
            transitions,
            vec![Mode::Break, Mode::Break, Mode::Break, Mode::LongBreak]
        );
        let cycles: Vec<u32> = h
            .recorder
            .completions()
            .iter()
            .filter(|c| c.finished == Mode::Focus)
            .map(|c| c.completed_focus_cycles)
            .collect();
        assert_eq!(cycles, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_long_break_completion_keeps_cycle_count() {
        let mut h = Harness::short();
        h.timer.update_setting(SettingField::Cycles, "1");

        h.run_to_completion();
        assert_eq!(h.timer.state().mode, Mode::LongBreak);

        h.run_to_completion();
        assert_eq!(h.timer.state().mode, Mode::Focus);
        assert_eq!(h.timer.state().completed_focus_cycles, 1);
        assert_eq!(
            h.recorder.completions().last(),
            Some(&Completion {
                finished: Mode::LongBreak,
                next: Mode::Focus,
                completed_focus_cycles: 1,
            })
        );
    }

    #[test]
    fn test_reset_during_break_restores_break_length() {
        let mut h = Harness::new();
        h.timer.update_setting(SettingField::Focus, "1");
        h.run_to_completion();
        assert_eq!(h.timer.state().mode, Mode::Break);
        assert_eq!(h.timer.state().completed_focus_cycles, 1);

        h.timer.start();
        h.advance(42);
        h.timer.reset();

        let state = h.timer.state();
        assert_eq!(state.mode, Mode::Break);
        assert_eq!(state.remaining_seconds, 5 * 60);
        assert_eq!(state.completed_focus_cycles, 0);
        assert!(!state.running);
        assert_eq!(h.clock.active_schedules(), 0);
    }

    #[test]
    fn test_switch_mode_while_running_stops_ticking() {
        let mut h = Harness::new();
        h.timer.switch_mode(Mode::Break);
        h.timer.start();
        h.advance(5);

        h.timer.switch_mode(Mode::Focus);
        assert_eq!(h.remaining(), 25 * 60);
        assert!(!h.timer.state().running);

        h.advance(10);
        assert_eq!(h.remaining(), 25 * 60);
        assert_eq!(h.clock.active_schedules(), 0);
    }

    #[test]
    fn test_switch_mode_clears_cycles() {
        let mut h = Harness::short();
        h.run_to_completion();
        assert_eq!(h.timer.state().completed_focus_cycles, 1);

        h.timer.switch_mode(Mode::LongBreak);
        assert_eq!(h.timer.state().completed_focus_cycles, 0);
        assert_eq!(h.timer.state().mode, Mode::LongBreak);
        assert_eq!(h.remaining(), 60);
    }

    #[test]
    fn test_update_setting_clamps_and_defaults() {
        let mut h = Harness::new();
        assert_eq!(h.timer.update_setting(SettingField::Focus, "999"), 180);
        assert_eq!(h.remaining(), 180 * 60);

        assert_eq!(h.timer.update_setting(SettingField::Focus, "abc"), 25);
        assert_eq!(h.remaining(), 25 * 60);
    }

    #[test]
    fn test_update_setting_persists_whole_record() {
        let mut h = Harness::new();
        h.timer.update_setting(SettingField::Break, "12");

        assert_eq!(
            h.store.record(),
            Some(json!({ "focus": 25, "break": 12, "long": 15, "cycles": 4 }))
        );
    }

    #[test]
    fn test_update_setting_stops_and_reloads_current_mode() {
        let mut h = Harness::new();
        h.timer.switch_mode(Mode::Break);
        h.timer.start();
        h.advance(20);

        h.timer.update_setting(SettingField::Focus, "40");
        assert!(!h.timer.state().running);
        assert_eq!(h.timer.state().mode, Mode::Break);
        assert_eq!(h.remaining(), 5 * 60);

        h.advance(3);
        assert_eq!(h.remaining(), 5 * 60);
    }

    #[test]
    fn test_update_setting_keeps_focus_cycles() {
        let mut h = Harness::short();
        h.run_to_completion();
        assert_eq!(h.timer.state().mode, Mode::Break);
        assert_eq!(h.timer.state().completed_focus_cycles, 1);

        assert_eq!(h.timer.update_setting(SettingField::Break, "7"), 7);
        let state = h.timer.state();
        assert_eq!(state.completed_focus_cycles, 1);
        assert_eq!(state.mode, Mode::Break);
        assert_eq!(state.remaining_seconds, 420);

        // Second focus of a two-cycle cadence earns the long break
        h.run_to_completion();
        h.timer.update_setting(SettingField::Cycles, "2");
        assert_eq!(h.timer.state().mode, Mode::Focus);
        assert_eq!(h.timer.state().completed_focus_cycles, 1);

        h.run_to_completion();
        assert_eq!(h.timer.state().completed_focus_cycles, 2);
        assert_eq!(h.timer.state().mode, Mode::LongBreak);
    }

    #[test]
    fn test_loads_persisted_settings() {
        let h = Harness::with_store(MemoryStore::with_record(
            json!({ "focus": "50", "break": null, "long": 300, "cycles": 2 }),
        ));
        let settings = h.timer.settings();
        assert_eq!(settings.focus_minutes, 50);
        assert_eq!(settings.break_minutes, 5);
        assert_eq!(settings.long_break_minutes, 120);
        assert_eq!(settings.cycles_until_long_break, 2);
        assert_eq!(h.remaining(), 50 * 60);
    }

    #[test]
    fn test_failing_store_is_swallowed() {
        let mut h = Harness::with_store(MemoryStore::failing());
        assert_eq!(*h.timer.settings(), Settings::default());

        assert_eq!(h.timer.update_setting(SettingField::Focus, "30"), 30);
        assert_eq!(h.timer.settings().focus_minutes, 30);
        assert_eq!(h.remaining(), 30 * 60);
    }
}
