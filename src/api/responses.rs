//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::timer::{SettingField, Settings, ViewModel};

/// API response structure for timer commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub view: ViewModel,
}

impl ApiResponse {
    /// Create a response whose status reflects whether the timer is ticking
    pub fn new(message: String, view: ViewModel) -> Self {
        let status = if view.running { "running" } else { "paused" };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            view,
        }
    }
}

/// Body of `POST /settings/:field`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingUpdate {
    /// Raw input, either text or a number
    #[serde(default)]
    pub value: Value,
}

impl SettingUpdate {
    /// Input as text; anything that is not a string or number becomes empty
    /// and falls back to the field's default
    pub fn raw_text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        }
    }
}

/// Response to a settings change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingResponse {
    pub field: SettingField,
    pub value: u32,
    pub settings: Settings,
    pub view: ViewModel,
    pub timestamp: DateTime<Utc>,
}

/// Status response with timer and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub view: ViewModel,
    pub settings: Settings,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
