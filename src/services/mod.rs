//! External side effects module
//!
//! This module contains the best-effort affordances that react to timer
//! signals without being part of the timer itself.

pub mod notifier;

// Re-export main types
pub use notifier::{completion_message, NotificationText, Notifier};
