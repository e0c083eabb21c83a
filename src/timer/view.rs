//! Presentation projection of the timer state

use serde::{Deserialize, Serialize};

use super::format::format_mmss;
use crate::state::{Mode, TimerState};

/// Everything a presentation layer needs to draw the timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    /// Remaining time as `MM:SS`
    pub time: String,
    pub mode: Mode,
    pub label: String,
    /// Window or tab title, e.g. `24:59 • Pomodoro`
    pub title: String,
    pub running: bool,
    pub completed_focus_cycles: u32,
}

impl From<&TimerState> for ViewModel {
    fn from(state: &TimerState) -> Self {
        let time = format_mmss(state.remaining_seconds);
        Self {
            title: format!("{} • Pomodoro", time),
            time,
            mode: state.mode,
            label: state.mode.label().to_string(),
            running: state.running,
            completed_focus_cycles: state.completed_focus_cycles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_from_state() {
        let state = TimerState {
            mode: Mode::LongBreak,
            remaining_seconds: 14 * 60 + 7,
            running: true,
            completed_focus_cycles: 4,
        };

        let view = ViewModel::from(&state);
        assert_eq!(view.time, "14:07");
        assert_eq!(view.title, "14:07 • Pomodoro");
        assert_eq!(view.label, "Long Break");
        assert_eq!(view.mode, Mode::LongBreak);
        assert!(view.running);
        assert_eq!(view.completed_focus_cycles, 4);
    }
}
