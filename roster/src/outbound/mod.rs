//! Outbound adapters implementing roster domain ports.
//!
//! - **json_file**: loads uploaded batches from JSON files on disk
//! - **tracing_sink**: forwards operator notifications to the log stream
//!
//! Adapters only translate between domain types and their external
//! representation.

pub mod json_file;
pub mod tracing_sink;

pub use json_file::JsonFileRosterSource;
pub use tracing_sink::TracingNotificationSink;
