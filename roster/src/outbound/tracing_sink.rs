//! Notification sink that writes operator notifications to the log.

use tracing::{error, info, warn};

use crate::domain::ports::NotificationSink;
use crate::domain::{Notification, Severity};

/// Emits each notification as a `tracing` event at a level matching its
/// severity. Used by headless tools that have no UI to render toasts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        let message = notification.message();
        match notification.severity() {
            Severity::Success => info!(target: "roster::notifications", %message, "success"),
            Severity::Warning => warn!(target: "roster::notifications", %message, "warning"),
            Severity::Error => error!(target: "roster::notifications", %message, "error"),
        }
    }
}
