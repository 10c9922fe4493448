//! Ports at the edge of the roster domain.

mod confirmation_prompt;
mod notification_sink;
mod roster_source;

#[cfg(test)]
pub use confirmation_prompt::MockConfirmationPrompt;
pub use confirmation_prompt::{ConfirmationPrompt, ConfirmationRequest, FixedConfirmationPrompt};
#[cfg(test)]
pub use notification_sink::MockNotificationSink;
pub use notification_sink::{NotificationSink, RecordingNotificationSink};
pub use roster_source::{FixtureRosterSource, RosterSource, RosterSourceError};
