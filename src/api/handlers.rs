//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    state::{AppState, Mode},
    timer::{SettingField, Settings},
};
use super::responses::{
    ApiResponse, HealthResponse, SettingResponse, SettingUpdate, StatusResponse,
};

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok(view) => {
            info!("Start endpoint called - {} {}", view.label, view.time);
            Ok(Json(ApiResponse::new("Timer started".to_string(), view)))
        }
        Err(e) => {
            error!("Failed to start timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.pause() {
        Ok(view) => {
            info!("Pause endpoint called - {} {}", view.label, view.time);
            Ok(Json(ApiResponse::new("Timer paused".to_string(), view)))
        }
        Err(e) => {
            error!("Failed to pause timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Refill the current mode and clear the cycle count
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(view) => {
            info!("Reset endpoint called - {} {}", view.label, view.time);
            Ok(Json(ApiResponse::new("Timer reset".to_string(), view)))
        }
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /mode/:mode - Switch to focus, break or long break
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let mode: Mode = mode.parse().map_err(|e| {
        warn!("Rejected mode change: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    match state.select_mode(mode) {
        Ok(view) => {
            info!("Mode endpoint called - switched to {}", view.label);
            Ok(Json(ApiResponse::new(format!("Switched to {}", view.label), view)))
        }
        Err(e) => {
            error!("Failed to switch mode: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /settings - Return the current settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<Settings>, StatusCode> {
    state.settings().map(Json).map_err(|e| {
        error!("Failed to get settings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle POST /settings/:field - Change one setting
///
/// Out of range or non-numeric input is clamped or defaulted, never rejected.
pub async fn setting_handler(
    State(state): State<Arc<AppState>>,
    Path(field): Path<String>,
    Json(update): Json<SettingUpdate>,
) -> Result<Json<SettingResponse>, StatusCode> {
    let field: SettingField = field.parse().map_err(|e| {
        warn!("Rejected settings change: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    match state.change_setting(field, &update.raw_text()) {
        Ok(change) => {
            info!("Settings endpoint called - {} = {}", change.field, change.value);
            Ok(Json(SettingResponse {
                field: change.field,
                value: change.value,
                settings: change.settings,
                view: change.view,
                timestamp: Utc::now(),
            }))
        }
        Err(e) => {
            error!("Failed to change setting {}: {}", field, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let view = match state.view() {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to get timer view: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let settings = match state.settings() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get settings: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        view,
        settings,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
