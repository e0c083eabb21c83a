//! Desktop notifications for completed intervals

use notify_rust::Notification;
use tracing::{debug, info};

use crate::{state::Mode, timer::Completion};

/// Title and body shown for a completed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationText {
    pub title: &'static str,
    pub body: &'static str,
}

/// Pick the message for a completed interval
pub fn completion_message(completion: &Completion) -> NotificationText {
    match (completion.finished, completion.next) {
        (Mode::Focus, Mode::LongBreak) => NotificationText {
            title: "Focus complete!",
            body: "Time for a long break.",
        },
        (Mode::Focus, _) => NotificationText {
            title: "Focus complete!",
            body: "Time for a break.",
        },
        (_, _) => NotificationText {
            title: "Break over!",
            body: "Back to focus.",
        },
    }
}

/// Shows desktop notifications through the platform notification service
#[derive(Debug, Clone)]
pub struct Notifier {
    app_name: String,
}

impl Notifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    /// Show the notification for `completion`.
    ///
    /// The platform call blocks, so it runs on the blocking pool.
    pub async fn notify(&self, completion: &Completion) -> Result<(), String> {
        let text = completion_message(completion);
        let app_name = self.app_name.clone();
        debug!("Showing notification: {} {}", text.title, text.body);

        tokio::task::spawn_blocking(move || {
            Notification::new()
                .appname(&app_name)
                .summary(text.title)
                .body(text.body)
                .show()
                .map(|_| ())
                .map_err(|e| format!("Failed to show notification: {}", e))
        })
        .await
        .map_err(|e| format!("Notification task failed: {}", e))??;

        info!("Notification shown: {}", text.title);
        Ok(())
    }
}
