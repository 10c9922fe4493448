//! Port loading record batches uploaded by administrators.
//!
//! Loading is synchronous: batches are small and read once per upload.

use thiserror::Error;

use crate::domain::Record;

/// Errors raised by roster source adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterSourceError {
    /// The batch could not be read.
    #[error("roster source could not be read: {message}")]
    Read {
        /// What failed, with the path involved.
        message: String,
    },
    /// The batch was read but is not a list of records.
    #[error("roster source is malformed: {message}")]
    Parse {
        /// Decoder error with the path involved.
        message: String,
    },
}

impl RosterSourceError {
    /// Reading the batch failed.
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    /// The batch is not a JSON array of records.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// Supplies a batch of records of type `R`.
pub trait RosterSource<R: Record>: Send + Sync {
    /// Load every record in the batch, in upload order.
    fn load(&self) -> Result<Vec<R>, RosterSourceError>;
}

/// Source serving a fixed in-memory batch.
#[derive(Debug, Clone, Default)]
pub struct FixtureRosterSource<R> {
    records: Vec<R>,
}

impl<R> FixtureRosterSource<R> {
    /// Serve `records` on every load.
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }
}

impl<R: Record> RosterSource<R> for FixtureRosterSource<R> {
    fn load(&self) -> Result<Vec<R>, RosterSourceError> {
        Ok(self.records.clone())
    }
}
