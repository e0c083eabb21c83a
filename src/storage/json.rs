//! JSON file settings store
//!
//! Writes go to a temporary sibling file first and are then renamed over the
//! record, so a crash never leaves a half-written file behind.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, trace};

use super::{Result, SettingsStore};
use crate::timer::Settings;

/// Settings record stored as a single JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Option<Value>> {
        if !self.path.exists() {
            debug!(path = ?self.path, "no settings file yet");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let value = serde_json::from_str(&contents)?;
        debug!(path = ?self.path, "loaded settings file");
        Ok(Some(value))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(settings)?;
        let tmp_path = self.path.with_extension("tmp");

        trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        debug!(path = ?self.path, "settings saved");
        Ok(())
    }
}
