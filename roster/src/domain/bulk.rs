//! Bulk validation of uploaded record batches.
//!
//! Administrators upload many records at once. Every row goes through the
//! same presence check, schema and duplicate scan as a single add; rows are
//! also checked against the rows accepted before them in the same batch, so
//! a batch can never introduce a duplicate on its own.

use serde::Serialize;

use crate::domain::duplicates::{Collision, find_duplicates};
use crate::domain::record::{Field, Record};
use crate::domain::validation::Violation;

/// Reason a single row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowProblem {
    /// A required field is blank.
    Missing {
        /// Blank field.
        field: Field,
    },
    /// A schema rule failed.
    Invalid {
        /// Violated rule.
        violation: Violation,
    },
    /// The row duplicates an existing or earlier accepted record.
    Duplicate {
        /// Identity collision.
        collision: Collision,
    },
}

/// Problems found in one uploaded row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRejection {
    /// Zero-based position of the row in the batch.
    pub index: usize,
    /// Every problem found for the row.
    pub problems: Vec<RowProblem>,
}

/// Outcome of validating a batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    total_rows: usize,
    accepted: Vec<usize>,
    rejected: Vec<RowRejection>,
}

impl BatchReport {
    /// Number of rows in the batch.
    #[must_use]
    pub const fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Zero-based indices of rows that may be imported, in batch order.
    #[must_use]
    pub fn accepted(&self) -> &[usize] {
        &self.accepted
    }

    /// Rows that must be corrected before import.
    #[must_use]
    pub fn rejected(&self) -> &[RowRejection] {
        &self.rejected
    }

    /// Whether every row was accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Validate `rows` against `existing` records and against each other.
///
/// A row with blank required fields is reported for those fields only;
/// otherwise schema violations are reported, and only a schema-clean row is
/// scanned for duplicates. Rejected rows never count as existing records for
/// later rows.
pub fn validate_batch<'a, R, I>(rows: &[R], existing: I) -> BatchReport
where
    R: Record,
    I: IntoIterator<Item = &'a R>,
{
    let existing: Vec<&R> = existing.into_iter().collect();
    let mut admitted: Vec<&R> = Vec::new();
    let mut report = BatchReport {
        total_rows: rows.len(),
        ..BatchReport::default()
    };

    for (index, row) in rows.iter().enumerate() {
        let problems = row_problems(row, &existing, &admitted);
        if problems.is_empty() {
            report.accepted.push(index);
            admitted.push(row);
        } else {
            report.rejected.push(RowRejection { index, problems });
        }
    }

    report
}

fn row_problems<R: Record>(row: &R, existing: &[&R], admitted: &[&R]) -> Vec<RowProblem> {
    let missing = row.missing_required();
    if !missing.is_empty() {
        return missing
            .into_iter()
            .map(|field| RowProblem::Missing { field })
            .collect();
    }

    let violations = row.validate();
    if !violations.is_empty() {
        return violations
            .into_iter()
            .map(|violation| RowProblem::Invalid { violation })
            .collect();
    }

    let known = existing.iter().chain(admitted).copied();
    find_duplicates(row, known, None)
        .into_iter()
        .map(|collision| RowProblem::Duplicate { collision })
        .collect()
}
