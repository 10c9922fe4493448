//! Errors raised by roster record operations.
//!
//! Every variant is recoverable: the collection is left untouched and the
//! operator can correct the input and retry. [`RecordError::user_message`]
//! gives the text shown through the notification sink; `Display` is meant for
//! logs.

use pagination::PaginationError;
use thiserror::Error;

use crate::domain::duplicates::Collision;
use crate::domain::record::Field;
use crate::domain::validation::Violation;

/// Failure of a single record operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Required fields were left blank.
    #[error("missing required fields: {}", join(fields))]
    MissingFields {
        /// Blank fields in form order.
        fields: Vec<Field>,
    },
    /// One or more schema rules failed.
    #[error("validation failed: {}", join(violations))]
    Validation {
        /// Every violated rule.
        violations: Vec<Violation>,
    },
    /// The record collides with an existing one.
    #[error("duplicate record: {}", join(collisions))]
    Duplicate {
        /// Distinct identity collisions.
        collisions: Vec<Collision>,
    },
    /// A page-relative index does not point at a stored record.
    #[error("no record at index {page_index} of page {page}")]
    IndexOutOfRange {
        /// Current page when the index was resolved.
        page: usize,
        /// Page-relative index that was requested.
        page_index: usize,
    },
    /// Saving was requested while nothing is being edited.
    #[error("no record is being edited")]
    NoActiveEdit,
    /// Saving targets a different row than the one being edited.
    #[error("editing record {editing} but save targets record {requested}")]
    EditTargetMismatch {
        /// Absolute index held by the edit state.
        editing: usize,
        /// Absolute index resolved for the save.
        requested: usize,
    },
    /// The collection changed between requesting and committing a deletion.
    #[error("pending deletion no longer matches the stored record")]
    StaleDeletion,
    /// Navigation to a page that does not exist.
    #[error("page {page} is outside 1..={last}")]
    PageOutOfRange {
        /// Requested page.
        page: usize,
        /// Last available page.
        last: usize,
    },
    /// Page arithmetic failed.
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

impl RecordError {
    /// Operator-facing summary suitable for an error notification.
    ///
    /// # Examples
    /// ```
    /// use roster::domain::{Collision, RecordError};
    ///
    /// let error = RecordError::Duplicate {
    ///     collisions: vec![Collision::Code("1234567".to_owned())],
    /// };
    /// assert_eq!(error.user_message(), "Registro duplicado: código 1234567");
    /// ```
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingFields { fields } => {
                format!("Complete los campos obligatorios: {}", join(fields))
            }
            Self::Validation { violations } => {
                format!("Errores de validación: {}", join_with(violations, "; "))
            }
            Self::Duplicate { collisions } => {
                format!("Registro duplicado: {}", join(collisions))
            }
            Self::IndexOutOfRange { .. } | Self::StaleDeletion => {
                "El registro seleccionado ya no existe".to_owned()
            }
            Self::NoActiveEdit | Self::EditTargetMismatch { .. } => {
                "No hay un registro en edición".to_owned()
            }
            Self::PageOutOfRange { .. } | Self::Pagination(_) => {
                "La página solicitada no existe".to_owned()
            }
        }
    }

    /// Whether the error stems from operator input rather than navigation
    /// state.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFields { .. } | Self::Validation { .. } | Self::Duplicate { .. }
        )
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    join_with(items, ", ")
}

fn join_with<T: ToString>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_fields_list_every_field() {
        let err = RecordError::MissingFields {
            fields: vec![Field::Code, Field::Email],
        };
        assert_eq!(err.to_string(), "missing required fields: code, email");
        assert_eq!(
            err.user_message(),
            "Complete los campos obligatorios: code, email"
        );
    }

    #[rstest]
    fn validation_summary_uses_field_prefixed_messages() {
        let err = RecordError::Validation {
            violations: vec![
                Violation::new(Field::Code, "debe tener exactamente 7 dígitos"),
                Violation::new(Field::Email, "debe terminar en @ufps.edu.co"),
            ],
        };
        assert_eq!(
            err.user_message(),
            "Errores de validación: code: debe tener exactamente 7 dígitos; \
             email: debe terminar en @ufps.edu.co"
        );
    }

    #[rstest]
    fn duplicate_display_cites_each_collision() {
        let err = RecordError::Duplicate {
            collisions: vec![
                Collision::Code("1234567".to_owned()),
                Collision::Email("ana@ufps.edu.co".to_owned()),
            ],
        };
        assert_eq!(
            err.to_string(),
            "duplicate record: código 1234567, correo ana@ufps.edu.co"
        );
    }

    #[rstest]
    #[case(RecordError::NoActiveEdit, false)]
    #[case(RecordError::StaleDeletion, false)]
    #[case(RecordError::MissingFields { fields: vec![Field::Name] }, true)]
    fn classifies_input_errors(#[case] error: RecordError, #[case] expected: bool) {
        assert_eq!(error.is_input_error(), expected);
    }

    #[rstest]
    fn pagination_errors_convert() {
        let err: RecordError = PaginationError::Overflow.into();
        assert_eq!(err.to_string(), "page offset overflowed");
    }
}
