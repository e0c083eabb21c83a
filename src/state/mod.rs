//! State management module
//!
//! This module contains the countdown state and the shared application state
//! that owns the timer.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, SettingChange};
pub use timer_state::{Mode, TimerState};
