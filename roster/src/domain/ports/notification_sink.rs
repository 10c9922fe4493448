//! Driven port delivering operator notifications.
//!
//! Rendering (toasts, alerts) belongs to the UI adapter; the domain only
//! decides severity and text.

use std::sync::{Mutex, PoisonError};

use crate::domain::Notification;

/// Receives notifications emitted by record operations.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    /// Deliver one notification.
    fn notify(&self, notification: Notification);
}

/// Sink that keeps every notification in memory, in delivery order.
///
/// Useful for tests and for adapters that flush notifications in batches.
#[derive(Debug, Default)]
pub struct RecordingNotificationSink {
    delivered: Mutex<Vec<Notification>>,
}

impl RecordingNotificationSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notifications delivered so far.
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return the notifications delivered so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(
            &mut *self
                .delivered
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn notify(&self, notification: Notification) {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Severity;

    #[test]
    fn recording_sink_preserves_order() {
        let sink = RecordingNotificationSink::new();
        sink.notify(Notification::warning("first"));
        sink.notify(Notification::success("second"));

        let severities: Vec<Severity> = sink
            .delivered()
            .iter()
            .map(Notification::severity)
            .collect();
        assert_eq!(severities, vec![Severity::Warning, Severity::Success]);
    }

    #[test]
    fn drain_empties_the_sink() {
        let sink = RecordingNotificationSink::new();
        sink.notify(Notification::error("boom"));

        assert_eq!(sink.drain().len(), 1);
        assert!(sink.delivered().is_empty());
    }
}
