//! Declarative schema rules for roster records.
//!
//! Each record type exposes an ordered list of [`FieldRule`]s: a field, a
//! message and a pure check. [`validate`] evaluates every rule and collects
//! all failures; it never stops at the first one. A rule that cannot run
//! (a pattern that fails to compile) degrades the whole result to a single
//! [`Violation::generic`] entry.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::group::{GroupIdentifier, GroupIdentifierError};
use crate::domain::record::{Field, StudentRecord, UserRecord};

/// Email suffix every institutional address must end with.
pub const INSTITUTION_EMAIL_DOMAIN: &str = "@ufps.edu.co";
/// Minimum number of characters in a name.
pub const NAME_MIN: usize = 3;

const CODE_PATTERN: &str = r"^\d{7}$";
const DOCUMENT_PATTERN: &str = r"^\d{6,10}$";
const PHONE_PATTERN: &str = r"^\d{7,10}$";
const GROUP_IDENTIFIER_PATTERN: &str = r"^\d{7}-[A-Z]-\d{2}-\d{4}$";

static CODE_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static DOCUMENT_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static PHONE_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static GROUP_IDENTIFIER_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

/// Internal failure of a rule, as opposed to a rule that rejects input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A validation pattern failed to compile.
    #[error("validation pattern {pattern} failed to compile: {message}")]
    Pattern {
        /// Source of the pattern.
        pattern: &'static str,
        /// Compiler error text.
        message: String,
    },
}

fn compiled(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    pattern: &'static str,
) -> Result<&'static Regex, RuleError> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|error| RuleError::Pattern {
            pattern,
            message: error.to_string(),
        })
}

pub(crate) fn group_identifier_pattern() -> Result<&'static Regex, RuleError> {
    compiled(&GROUP_IDENTIFIER_RE, GROUP_IDENTIFIER_PATTERN)
}

/// A single schema violation, rendered as `"<field>: <message>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Violation {
    field: Field,
    message: String,
}

impl Violation {
    /// Build a violation for `field`.
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Catch-all reported when the validator itself fails.
    #[must_use]
    pub fn generic() -> Self {
        Self::new(Field::Record, "no fue posible validar el registro")
    }

    /// Field the violation refers to.
    #[must_use]
    pub const fn field(&self) -> Field {
        self.field
    }

    /// Operator-facing explanation.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Predicate evaluated against a record; `Ok(true)` means the rule holds.
pub type Check<R> = fn(&R) -> Result<bool, RuleError>;

/// Field, message and check triple making up one schema rule.
pub struct FieldRule<R> {
    field: Field,
    message: &'static str,
    check: Check<R>,
}

impl<R> FieldRule<R> {
    /// Declare a rule.
    pub const fn new(field: Field, message: &'static str, check: Check<R>) -> Self {
        Self {
            field,
            message,
            check,
        }
    }

    /// Field the rule constrains.
    pub const fn field(&self) -> Field {
        self.field
    }

    /// Message reported when the rule fails.
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// Evaluate the rule, returning the violation when it does not hold.
    pub fn evaluate(&self, record: &R) -> Result<Option<Violation>, RuleError> {
        let holds = (self.check)(record)?;
        Ok((!holds).then(|| Violation::new(self.field, self.message)))
    }
}

impl<R> fmt::Debug for FieldRule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("field", &self.field)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Evaluate every rule against `record` and collect the violations in rule
/// order.
///
/// # Examples
/// ```
/// use roster::domain::validation::{USER_RULES, validate};
/// use roster::domain::UserRecord;
///
/// let user = UserRecord::new("12", "Al", "1234567", "al@example.com");
/// let messages: Vec<String> = validate(&user, USER_RULES)
///     .iter()
///     .map(ToString::to_string)
///     .collect();
///
/// assert_eq!(messages.len(), 3);
/// assert!(messages[0].starts_with("code: "));
/// ```
pub fn validate<R>(record: &R, rules: &[FieldRule<R>]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for rule in rules {
        match rule.evaluate(record) {
            Ok(Some(violation)) => violations.push(violation),
            Ok(None) => {}
            Err(error) => {
                warn!(%error, field = %rule.field(), "validation rule failed to run");
                return vec![Violation::generic()];
            }
        }
    }
    violations
}

fn is_code(value: &str) -> Result<bool, RuleError> {
    Ok(compiled(&CODE_RE, CODE_PATTERN)?.is_match(value))
}

fn is_document_number(value: &str) -> Result<bool, RuleError> {
    Ok(compiled(&DOCUMENT_RE, DOCUMENT_PATTERN)?.is_match(value))
}

fn has_min_name_length(value: &str) -> bool {
    value.trim().chars().count() >= NAME_MIN
}

fn is_institutional_email(value: &str) -> bool {
    value.strip_suffix(INSTITUTION_EMAIL_DOMAIN).is_some_and(|local| {
        !local.is_empty() && !local.contains('@') && !local.contains(char::is_whitespace)
    })
}

fn is_optional_phone(value: Option<&str>) -> Result<bool, RuleError> {
    match value {
        None | Some("") => Ok(true),
        Some(phone) => Ok(compiled(&PHONE_RE, PHONE_PATTERN)?.is_match(phone)),
    }
}

/// Remove everything except ASCII digits.
#[must_use]
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

const CODE_MESSAGE: &str = "debe tener exactamente 7 dígitos";
const NAME_MESSAGE: &str = "debe tener al menos 3 caracteres";
const DOCUMENT_MESSAGE: &str = "debe tener entre 6 y 10 dígitos";
const EMAIL_MESSAGE: &str = "debe terminar en @ufps.edu.co";
const PHONE_MESSAGE: &str = "debe tener entre 7 y 10 dígitos";
const GROUP_MESSAGE: &str = "debe tener el formato 1154306-B-02-2025";

fn user_code(record: &UserRecord) -> Result<bool, RuleError> {
    is_code(&record.code)
}

fn user_name(record: &UserRecord) -> Result<bool, RuleError> {
    Ok(has_min_name_length(&record.name))
}

fn user_document(record: &UserRecord) -> Result<bool, RuleError> {
    is_document_number(&record.document_number)
}

fn user_email(record: &UserRecord) -> Result<bool, RuleError> {
    Ok(is_institutional_email(&record.email))
}

fn user_phone(record: &UserRecord) -> Result<bool, RuleError> {
    is_optional_phone(record.phone.as_deref().map(str::trim))
}

fn student_code(record: &StudentRecord) -> Result<bool, RuleError> {
    user_code(&record.profile)
}

fn student_name(record: &StudentRecord) -> Result<bool, RuleError> {
    user_name(&record.profile)
}

// Students may type separators in the document; only the digits count.
fn student_document(record: &StudentRecord) -> Result<bool, RuleError> {
    is_document_number(&digits_only(&record.profile.document_number))
}

fn student_email(record: &StudentRecord) -> Result<bool, RuleError> {
    user_email(&record.profile)
}

fn student_phone(record: &StudentRecord) -> Result<bool, RuleError> {
    user_phone(&record.profile)
}

fn student_group(record: &StudentRecord) -> Result<bool, RuleError> {
    match GroupIdentifier::new(record.effective_group_identifier()) {
        Ok(_) => Ok(true),
        Err(GroupIdentifierError::Empty | GroupIdentifierError::InvalidFormat) => Ok(false),
        Err(GroupIdentifierError::Pattern(error)) => Err(error),
    }
}

/// Schema for professor and administrative user records.
pub const USER_RULES: &[FieldRule<UserRecord>] = &[
    FieldRule::new(Field::Code, CODE_MESSAGE, user_code),
    FieldRule::new(Field::Name, NAME_MESSAGE, user_name),
    FieldRule::new(Field::DocumentNumber, DOCUMENT_MESSAGE, user_document),
    FieldRule::new(Field::Email, EMAIL_MESSAGE, user_email),
    FieldRule::new(Field::Phone, PHONE_MESSAGE, user_phone),
];

/// Schema for student records.
pub const STUDENT_RULES: &[FieldRule<StudentRecord>] = &[
    FieldRule::new(Field::Code, CODE_MESSAGE, student_code),
    FieldRule::new(Field::Name, NAME_MESSAGE, student_name),
    FieldRule::new(Field::DocumentNumber, DOCUMENT_MESSAGE, student_document),
    FieldRule::new(Field::Email, EMAIL_MESSAGE, student_email),
    FieldRule::new(Field::Phone, PHONE_MESSAGE, student_phone),
    FieldRule::new(Field::GroupIdentifier, GROUP_MESSAGE, student_group),
];
