//! Pomodoro Server - A state-managed HTTP server running an interval timer
//!
//! This library provides the focus/break countdown state machine, settings
//! persistence, and the HTTP command surface that drives it.

pub mod config;
pub mod state;
pub mod storage;
pub mod timer;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use timer::{IntervalTimer, Settings};
pub use utils::signals::shutdown_signal;
