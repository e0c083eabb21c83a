//! In-memory settings store

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use super::{Result, SettingsStore, StoreError};
use crate::timer::Settings;

/// Settings store kept in memory.
///
/// Clones share the same record. A store built with [`MemoryStore::failing`]
/// rejects every read and write, which stands in for unavailable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Arc<Mutex<Option<Value>>>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing record
    pub fn with_record(record: Value) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(record))),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            record: Arc::default(),
            failing: true,
        }
    }

    /// Current record, if any was loaded or saved
    pub fn record(&self) -> Option<Value> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<Value>> {
        if self.failing {
            return Err(StoreError::Unavailable("memory store set to fail".to_string()));
        }
        Ok(self.record())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if self.failing {
            return Err(StoreError::Unavailable("memory store set to fail".to_string()));
        }
        let value = serde_json::to_value(settings)?;
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
        Ok(())
    }
}
