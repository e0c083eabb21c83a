//! Settings persistence
//!
//! The timer keeps one settings record. Stores only move raw JSON in and
//! out; clamping and per-field fallback happen in [`crate::timer::Settings`].

pub mod json;
pub mod memory;

use serde_json::Value;
use thiserror::Error;

use crate::timer::Settings;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// File name of the persisted settings record
pub const SETTINGS_FILE_NAME: &str = "pomodoro_settings_v1.json";

/// Errors raised by a settings store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Key/value persistence for the settings record
pub trait SettingsStore: Send {
    /// Read the stored record, `Ok(None)` when nothing has been saved yet
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<Value>>;

    /// Overwrite the stored record
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save(&self, settings: &Settings) -> Result<()>;
}
