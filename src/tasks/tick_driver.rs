//! Tick driver background task

use std::sync::Arc;
use tracing::{error, info};

use crate::{state::AppState, timer::TickReceiver};

/// Background task that feeds clock ticks into the timer.
///
/// Returns once every tick sender is dropped. The timer inside `AppState`
/// holds a sender, so in the server this task lives as long as the process
/// and ends with the runtime on shutdown.
pub async fn tick_driver_task(state: Arc<AppState>, mut ticks: TickReceiver) {
    info!("Starting tick driver task");

    while let Some(schedule) = ticks.recv().await {
        if let Err(e) = state.tick(schedule) {
            error!("Failed to apply tick: {}", e);
        }
    }

    info!("Tick channel closed, tick driver stopping");
}
