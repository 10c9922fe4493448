//! Roster domain: record model, validation, duplicate detection and the
//! paginated record operations controller.
//!
//! Public surface:
//! - UserRecord / StudentRecord: raw form input for each record variant.
//! - Record: shared behaviour (schema, identity, presence check).
//! - find_duplicates: identity collision scan.
//! - RecordOperations: add, edit and two-phase delete over a paginated roster.
//! - validate_batch: bulk validation of uploaded rows.

pub mod bulk;
pub mod duplicates;
pub mod error;
pub mod group;
pub mod notification;
pub mod operations;
pub mod ports;
pub mod record;
pub mod validation;

pub use self::bulk::{BatchReport, RowProblem, RowRejection, validate_batch};
pub use self::duplicates::{Collision, find_duplicates};
pub use self::error::RecordError;
pub use self::group::{GroupIdentifier, GroupIdentifierError};
pub use self::notification::{Notification, Severity};
pub use self::operations::{
    DeleteOutcome, EditState, PendingDeletion, RecordId, RecordOperations, StoredRecord,
};
pub use self::record::{Field, Record, RecordIdentity, RecordKind, StudentRecord, UserRecord};
pub use self::validation::{FieldRule, Violation};
