//! Duplicate detection over an in-memory roster.

use std::fmt;

use serde::Serialize;

use crate::domain::record::Record;

/// Identity field shared between a candidate and an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum Collision {
    /// Same institutional code.
    Code(String),
    /// Same identity document number.
    DocumentNumber(String),
    /// Same email, ignoring case.
    Email(String),
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(value) => write!(f, "código {value}"),
            Self::DocumentNumber(value) => write!(f, "documento {value}"),
            Self::Email(value) => write!(f, "correo {value}"),
        }
    }
}

/// Scan `existing` for records sharing an identity field with `candidate`.
///
/// The entry at `exclude_index` is skipped so a record being edited is not
/// reported against itself. Code and document number only collide when both
/// records share the same uniqueness scope (the student group); email always
/// collides, compared case-insensitively. Every colliding entry is visited
/// and the descriptions are returned once each, in first-seen order.
///
/// # Examples
/// ```
/// use roster::domain::{UserRecord, find_duplicates};
///
/// let ana = UserRecord::new("1234567", "Ana Li", "1234567", "ana@ufps.edu.co");
/// let existing = vec![ana.clone()];
///
/// assert_eq!(find_duplicates(&ana, &existing, None).len(), 3);
/// assert!(find_duplicates(&ana, &existing, Some(0)).is_empty());
/// ```
pub fn find_duplicates<'a, R, I>(
    candidate: &R,
    existing: I,
    exclude_index: Option<usize>,
) -> Vec<Collision>
where
    R: Record,
    I: IntoIterator<Item = &'a R>,
{
    let wanted = candidate.identity();
    let wanted_email = wanted.email.trim().to_lowercase();
    let mut collisions = Vec::new();

    for (index, other) in existing.into_iter().enumerate() {
        if Some(index) == exclude_index {
            continue;
        }
        let found = other.identity();

        if wanted.scope == found.scope {
            if !wanted.code.is_empty() && wanted.code == found.code {
                push_unique(&mut collisions, Collision::Code(wanted.code.to_owned()));
            }
            if !wanted.document_number.is_empty()
                && wanted.document_number == found.document_number
            {
                push_unique(
                    &mut collisions,
                    Collision::DocumentNumber(wanted.document_number.to_string()),
                );
            }
        }
        if !wanted_email.is_empty() && wanted_email == found.email.trim().to_lowercase() {
            push_unique(&mut collisions, Collision::Email(wanted.email.to_owned()));
        }
    }

    collisions
}

fn push_unique(collisions: &mut Vec<Collision>, collision: Collision) {
    if !collisions.contains(&collision) {
        collisions.push(collision);
    }
}
