//! Countdown state and interval modes

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Interval type the countdown is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "focus")]
    Focus,
    #[serde(rename = "break")]
    Break,
    #[serde(rename = "long")]
    LongBreak,
}

impl Mode {
    /// Wire tag used in routes and persisted data
    pub fn tag(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::Break => "break",
            Mode::LongBreak => "long",
        }
    }

    /// Human readable name for the presentation layer
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Focus => "Focus",
            Mode::Break => "Break",
            Mode::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "focus" => Ok(Mode::Focus),
            "break" => Ok(Mode::Break),
            "long" | "long-break" | "longbreak" => Ok(Mode::LongBreak),
            other => Err(format!("Unknown mode: {}", other)),
        }
    }
}

/// Timer state for the running countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: Mode,
    pub remaining_seconds: u64,
    pub running: bool,
    pub completed_focus_cycles: u32,
}

impl TimerState {
    /// Create a stopped focus countdown with the given duration
    pub fn new(focus_seconds: u64) -> Self {
        Self {
            mode: Mode::Focus,
            remaining_seconds: focus_seconds,
            running: false,
            completed_focus_cycles: 0,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(crate::timer::settings::DEFAULT_FOCUS_MINUTES as u64 * 60)
    }
}
