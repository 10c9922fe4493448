//! User and student record model.
//!
//! Records are raw form input: every field is kept as typed by the operator
//! so the validator can report all problems at once instead of failing on
//! the first malformed value. Uniqueness rules read a record through its
//! [`RecordIdentity`].

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::group::GroupIdentifier;
use crate::domain::validation::{self, FieldRule, Violation};

/// Form fields a violation or presence check can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Seven digit institutional code.
    Code,
    /// Full name.
    Name,
    /// National identity document number.
    DocumentNumber,
    /// Institutional email address.
    Email,
    /// Optional contact phone.
    Phone,
    /// Student group key.
    GroupIdentifier,
    /// The record as a whole, used when validation cannot run.
    Record,
}

impl Field {
    /// Stable field key used in violation messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Name => "name",
            Self::DocumentNumber => "document_number",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::GroupIdentifier => "group_identifier",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record variants managed by the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Professors and administrative users.
    User,
    /// Students enrolled in a group.
    Student,
}

impl RecordKind {
    /// Label shown to operators in notifications.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::User => "Usuario",
            Self::Student => "Estudiante",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Student => f.write_str("student"),
        }
    }
}

/// Fields that decide whether two records describe the same person.
///
/// `scope` is `None` for globally unique records. Two records only collide
/// on `code` or `document_number` when their scopes are equal. The document
/// number is given in the form the schema checks it, so separators typed by
/// the operator never hide a duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIdentity<'a> {
    /// Institutional code.
    pub code: &'a str,
    /// Identity document number, normalised for comparison.
    pub document_number: Cow<'a, str>,
    /// Email, compared case-insensitively.
    pub email: &'a str,
    /// Uniqueness scope for code and document number.
    pub scope: Option<Cow<'a, str>>,
}

/// Behaviour shared by every record variant the roster manages.
pub trait Record: Clone + Default + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Variant tag used in logs and notifications.
    const KIND: RecordKind;

    /// Declarative rule list evaluated by [`Record::validate`].
    fn rules() -> &'static [FieldRule<Self>];

    /// Identity fields used by duplicate detection.
    fn identity(&self) -> RecordIdentity<'_>;

    /// Personal and contact fields as entered.
    fn profile(&self) -> &UserRecord;

    /// Full name as entered.
    fn name(&self) -> &str {
        &self.profile().name
    }

    /// Run every schema rule and collect the violations.
    fn validate(&self) -> Vec<Violation> {
        validation::validate(self, Self::rules())
    }

    /// Required fields left blank, in form order.
    ///
    /// This is a presence check only; malformed values are reported by
    /// [`Record::validate`].
    fn missing_required(&self) -> Vec<Field> {
        let profile = self.profile();
        [
            (Field::Code, profile.code.as_str()),
            (Field::Name, profile.name.as_str()),
            (Field::DocumentNumber, profile.document_number.as_str()),
            (Field::Email, profile.email.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

/// Professor or administrative user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Seven digit institutional code.
    pub code: String,
    /// Full name.
    pub name: String,
    /// Identity document number.
    pub document_number: String,
    /// Institutional email.
    pub email: String,
    /// Optional phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl UserRecord {
    /// Build a user record from the required fields.
    ///
    /// # Examples
    /// ```
    /// use roster::domain::{Record, UserRecord};
    ///
    /// let user = UserRecord::new("1234567", "Ana Li", "1234567", "ana@ufps.edu.co");
    /// assert!(user.validate().is_empty());
    /// ```
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        document_number: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            document_number: document_number.into(),
            email: email.into(),
            phone: None,
        }
    }

    /// Attach a phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

impl Record for UserRecord {
    const KIND: RecordKind = RecordKind::User;

    fn rules() -> &'static [FieldRule<Self>] {
        validation::USER_RULES
    }

    fn identity(&self) -> RecordIdentity<'_> {
        RecordIdentity {
            code: &self.code,
            document_number: Cow::Borrowed(&self.document_number),
            email: &self.email,
            scope: None,
        }
    }

    fn profile(&self) -> &UserRecord {
        self
    }
}

/// Student enrolled in a subject group.
///
/// The group is either given directly through `group_identifier` or built
/// from `subject_code`, `group_name`, `period` and `year`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Personal and contact fields shared with users.
    #[serde(flatten)]
    pub profile: UserRecord,
    /// Seven digit subject code.
    #[serde(default)]
    pub subject_code: String,
    /// Single upper-case group letter.
    #[serde(default)]
    pub group_name: String,
    /// Two digit academic period.
    #[serde(default)]
    pub period: String,
    /// Four digit year.
    #[serde(default)]
    pub year: String,
    /// Explicit group key; takes precedence over the component fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<String>,
}

impl StudentRecord {
    /// Build a student from profile fields and an explicit group key.
    pub fn new(profile: UserRecord, group_identifier: impl Into<String>) -> Self {
        Self {
            profile,
            group_identifier: Some(group_identifier.into()),
            ..Self::default()
        }
    }

    /// Build a student whose group key is derived from its components.
    pub fn from_group_parts(
        profile: UserRecord,
        subject_code: impl Into<String>,
        group_name: impl Into<String>,
        period: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            profile,
            subject_code: subject_code.into(),
            group_name: group_name.into(),
            period: period.into(),
            year: year.into(),
            group_identifier: None,
        }
    }

    /// Group key in effect for this student: the explicit identifier when
    /// present and non-blank, otherwise one composed from the group parts.
    pub fn effective_group_identifier(&self) -> Cow<'_, str> {
        match self.group_identifier.as_deref().map(str::trim) {
            Some(explicit) if !explicit.is_empty() => Cow::Borrowed(explicit),
            _ => Cow::Owned(GroupIdentifier::compose(
                &self.subject_code,
                &self.group_name,
                &self.period,
                &self.year,
            )),
        }
    }
}

impl Record for StudentRecord {
    const KIND: RecordKind = RecordKind::Student;

    fn rules() -> &'static [FieldRule<Self>] {
        validation::STUDENT_RULES
    }

    fn identity(&self) -> RecordIdentity<'_> {
        RecordIdentity {
            code: &self.profile.code,
            document_number: Cow::Owned(validation::digits_only(&self.profile.document_number)),
            email: &self.profile.email,
            scope: Some(self.effective_group_identifier()),
        }
    }

    fn profile(&self) -> &UserRecord {
        &self.profile
    }
}
