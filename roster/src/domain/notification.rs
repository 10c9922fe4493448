//! Operator notifications emitted by record operations.

use serde::Serialize;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The operation completed.
    Success,
    /// The operation has side effects the operator should notice.
    Warning,
    /// The operation was rejected.
    Error,
}

/// Message handed to the notification sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    severity: Severity,
    message: String,
}

impl Notification {
    /// Build a notification with an explicit severity.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    /// Warning notification.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// How the notification should be presented.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Text shown to the operator.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
