//! Completion listener background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{services::Notifier, state::AppState};

/// Background task that reacts to completed intervals.
///
/// Every completion is logged; when a notifier is configured a desktop
/// notification is shown as well. Notification failures never reach the timer.
pub async fn completion_notifier_task(state: Arc<AppState>, notifier: Option<Notifier>) {
    info!("Starting completion notifier task");

    let mut completions = state.subscribe_completions();

    loop {
        match completions.recv().await {
            Ok(completion) => {
                info!(
                    "{} finished, {} is ready (focus cycles: {})",
                    completion.finished.label(),
                    completion.next.label(),
                    completion.completed_focus_cycles
                );

                if let Some(notifier) = &notifier {
                    if let Err(e) = notifier.notify(&completion).await {
                        warn!("{}", e);
                    }
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Completion notifier lagged, skipped {} completions", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Completion channel closed, notifier stopping");
                break;
            }
        }
    }
}
