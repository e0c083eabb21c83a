//! Main application state management

use std::{sync::Mutex, time::Instant};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use super::{Mode, TimerState};
use crate::{
    storage::SettingsStore,
    timer::{
        Clock, Completion, IntervalTimer, ScheduleId, SettingField, Settings, TickSender,
        TimerObserver, ViewModel,
    },
};

/// Forwards timer output into the application's channels
struct ChannelObserver {
    view_tx: watch::Sender<ViewModel>,
    completion_tx: broadcast::Sender<Completion>,
}

impl TimerObserver for ChannelObserver {
    fn render(&self, view: &ViewModel) {
        self.view_tx.send_replace(view.clone());
    }

    fn interval_complete(&self, completion: &Completion) {
        if let Err(e) = self.completion_tx.send(*completion) {
            debug!("No completion listeners: {}", e);
        }
    }
}

/// Result of a settings change
#[derive(Debug, Clone)]
pub struct SettingChange {
    pub field: SettingField,
    pub value: u32,
    pub settings: Settings,
    pub view: ViewModel,
}

/// Main application state that owns the interval timer
pub struct AppState {
    /// The one timer instance; commands and ticks are applied under this lock
    timer: Mutex<IntervalTimer>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Latest rendered view
    view_rx: watch::Receiver<ViewModel>,
    /// Completed intervals
    completion_tx: broadcast::Sender<Completion>,
}

impl AppState {
    /// Create the state and its timer. Persisted settings are loaded here.
    pub fn new(
        port: u16,
        host: String,
        clock: Box<dyn Clock>,
        ticks: TickSender,
        store: Box<dyn SettingsStore>,
    ) -> Self {
        let (completion_tx, _) = broadcast::channel(16);
        let (view_tx, view_rx) = watch::channel(ViewModel::from(&TimerState::default()));

        let observer = ChannelObserver {
            view_tx,
            completion_tx: completion_tx.clone(),
        };
        let timer = IntervalTimer::new(clock, ticks, store, Box::new(observer));

        Self {
            timer: Mutex::new(timer),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            view_rx,
            completion_tx,
        }
    }

    /// Run a command against the timer and record it as the last action
    fn command<R, F>(&self, action: &str, f: F) -> Result<R, String>
    where
        F: FnOnce(&mut IntervalTimer) -> R,
    {
        let mut timer = self
            .timer
            .lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;
        let result = f(&mut *timer);
        drop(timer);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(result)
    }

    fn read<R, F>(&self, f: F) -> Result<R, String>
    where
        F: FnOnce(&IntervalTimer) -> R,
    {
        self.timer
            .lock()
            .map(|timer| f(&*timer))
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    /// Start counting down
    pub fn start(&self) -> Result<ViewModel, String> {
        info!("Start requested");
        self.command("start", |timer| {
            timer.start();
            timer.view()
        })
    }

    /// Pause the countdown
    pub fn pause(&self) -> Result<ViewModel, String> {
        info!("Pause requested");
        self.command("pause", |timer| {
            timer.pause();
            timer.view()
        })
    }

    /// Reset the current mode and the cycle count
    pub fn reset(&self) -> Result<ViewModel, String> {
        info!("Reset requested");
        self.command("reset", |timer| {
            timer.reset();
            timer.view()
        })
    }

    /// Switch to another mode
    pub fn select_mode(&self, mode: Mode) -> Result<ViewModel, String> {
        info!("Mode {} selected", mode);
        self.command(&format!("mode-{}", mode.tag()), |timer| {
            timer.switch_mode(mode);
            timer.view()
        })
    }

    /// Change one setting from raw user input
    pub fn change_setting(&self, field: SettingField, raw: &str) -> Result<SettingChange, String> {
        self.command(&format!("setting-{}", field.key()), |timer| {
            let value = timer.update_setting(field, raw);
            SettingChange {
                field,
                value,
                settings: *timer.settings(),
                view: timer.view(),
            }
        })
    }

    /// Apply a tick delivered by the clock
    pub fn tick(&self, schedule: ScheduleId) -> Result<(), String> {
        let mut timer = self
            .timer
            .lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;
        timer.tick(schedule);
        Ok(())
    }

    /// Get the current view of the timer
    pub fn view(&self) -> Result<ViewModel, String> {
        self.read(|timer| timer.view())
    }

    /// Get the current settings
    pub fn settings(&self) -> Result<Settings, String> {
        self.read(|timer| *timer.settings())
    }

    /// Watch every rendered view
    pub fn subscribe_views(&self) -> watch::Receiver<ViewModel> {
        self.view_rx.clone()
    }

    /// Listen for completed intervals
    pub fn subscribe_completions(&self) -> broadcast::Receiver<Completion> {
        self.completion_tx.subscribe()
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
}
