//! Driven port asking the operator to confirm a destructive action.
//!
//! The prompt is the only suspension point in the roster: callers await the
//! decision and must not mutate anything until it resolves.

use async_trait::async_trait;
use serde::Serialize;

/// Title and body shown in the confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationRequest {
    title: String,
    message: String,
}

impl ConfirmationRequest {
    /// Build a request.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Dialog title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Dialog body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Asks the operator a yes/no question.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Resolve to `true` when the operator confirms.
    async fn confirm(&self, request: &ConfirmationRequest) -> bool;
}

/// Prompt that always answers the same way, for unattended runs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedConfirmationPrompt {
    answer: bool,
}

impl FixedConfirmationPrompt {
    /// Prompt that confirms every request.
    #[must_use]
    pub const fn accepting() -> Self {
        Self { answer: true }
    }

    /// Prompt that declines every request.
    #[must_use]
    pub const fn declining() -> Self {
        Self { answer: false }
    }
}

#[async_trait]
impl ConfirmationPrompt for FixedConfirmationPrompt {
    async fn confirm(&self, _request: &ConfirmationRequest) -> bool {
        self.answer
    }
}
