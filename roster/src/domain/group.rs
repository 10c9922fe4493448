//! Student group identifier.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::validation::{RuleError, group_identifier_pattern};

/// Validation errors returned by [`GroupIdentifier::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupIdentifierError {
    /// Identifier is blank.
    #[error("group identifier must not be empty")]
    Empty,
    /// Identifier does not follow `subject-group-period-year`.
    #[error("group identifier must look like 1154306-B-02-2025")]
    InvalidFormat,
    /// The format pattern could not be built.
    #[error(transparent)]
    Pattern(#[from] RuleError),
}

/// Composite key `subject_code-group_name-period-year` scoping student
/// uniqueness, e.g. `1154306-B-02-2025`.
///
/// ## Invariants
/// - Matches `^\d{7}-[A-Z]-\d{2}-\d{4}$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupIdentifier(String);

impl GroupIdentifier {
    /// Validate and construct a [`GroupIdentifier`].
    ///
    /// # Examples
    /// ```
    /// use roster::domain::GroupIdentifier;
    ///
    /// let group = GroupIdentifier::new("1154306-B-02-2025").expect("valid group");
    /// assert_eq!(group.as_ref(), "1154306-B-02-2025");
    /// assert!(GroupIdentifier::new("1154306-b-2-2025").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, GroupIdentifierError> {
        Self::from_owned(value.into())
    }

    /// Join trimmed components with `-` without validating them.
    #[must_use]
    pub fn compose(subject_code: &str, group_name: &str, period: &str, year: &str) -> String {
        [subject_code, group_name, period, year]
            .map(str::trim)
            .join("-")
    }

    fn from_owned(value: String) -> Result<Self, GroupIdentifierError> {
        if value.trim().is_empty() {
            return Err(GroupIdentifierError::Empty);
        }
        if !group_identifier_pattern()?.is_match(&value) {
            return Err(GroupIdentifierError::InvalidFormat);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for GroupIdentifier {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GroupIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<GroupIdentifier> for String {
    fn from(value: GroupIdentifier) -> Self {
        value.0
    }
}

impl TryFrom<String> for GroupIdentifier {
    type Error = GroupIdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
