//! Record operations over a paginated roster.
//!
//! [`RecordOperations`] owns the authoritative collection, the add form
//! draft and the single in-flight edit. Views address records by their
//! position on the current page; every operation translates that position
//! into an absolute index before touching the collection. Input problems
//! (blank fields, schema violations, duplicates) never mutate anything and
//! are reported through the [`NotificationSink`].

use std::fmt;
use std::mem;
use std::sync::Arc;

use mockable::Clock;
use pagination::{Page, PageNumber, PageRequest, PageSize, PaginationError, total_pages};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::bulk::{BatchReport, validate_batch};
use crate::domain::duplicates::find_duplicates;
use crate::domain::error::RecordError;
use crate::domain::notification::Notification;
use crate::domain::ports::{ConfirmationPrompt, ConfirmationRequest, NotificationSink};
use crate::domain::record::Record;

/// Synthetic identifier assigned on insert for UI keying.
///
/// Derived from the creation timestamp in milliseconds and bumped when the
/// clock has not advanced, so identifiers stay unique within a roster. It
/// plays no part in business uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Raw millisecond value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record held in the roster together with its synthetic id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredRecord<R> {
    id: RecordId,
    #[serde(flatten)]
    record: R,
}

impl<R> StoredRecord<R> {
    /// Synthetic id assigned on insert.
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }

    /// The stored record.
    #[must_use]
    pub const fn record(&self) -> &R {
        &self.record
    }

    /// Consume the entry and return the record.
    #[must_use]
    pub fn into_record(self) -> R {
        self.record
    }
}

/// The single record being edited: a working copy plus the absolute index
/// it will be written back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState<R> {
    index: usize,
    record: R,
}

impl<R> EditState<R> {
    /// Absolute index of the record under edit.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Working copy with the operator's changes.
    #[must_use]
    pub const fn record(&self) -> &R {
        &self.record
    }
}

/// First phase of a deletion: the target is resolved but nothing has been
/// removed yet. Pass it to [`RecordOperations::commit_delete`] once the
/// operator confirms, or to [`RecordOperations::abort_delete`] otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending deletion does nothing until committed or aborted"]
pub struct PendingDeletion {
    index: usize,
    id: RecordId,
    request: ConfirmationRequest,
}

impl PendingDeletion {
    /// Absolute index that will be removed.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Question to put to the operator.
    #[must_use]
    pub const fn request(&self) -> &ConfirmationRequest {
        &self.request
    }
}

/// Result of an interactive deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome<R> {
    /// The operator confirmed and the record was removed.
    Deleted(StoredRecord<R>),
    /// The operator declined; nothing changed.
    Cancelled,
}

/// Controller for add, edit and delete over a paginated roster.
pub struct RecordOperations<R, N> {
    records: Vec<StoredRecord<R>>,
    draft: R,
    edit: Option<EditState<R>>,
    page: PageNumber,
    page_size: PageSize,
    last_id: Option<RecordId>,
    notifications: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<R, N> RecordOperations<R, N>
where
    R: Record,
    N: NotificationSink,
{
    /// Create an empty roster on page 1.
    pub fn new(notifications: Arc<N>, clock: Arc<dyn Clock>, page_size: PageSize) -> Self {
        Self {
            records: Vec::new(),
            draft: R::default(),
            edit: None,
            page: PageNumber::FIRST,
            page_size,
            last_id: None,
            notifications,
            clock,
        }
    }

    /// Seed the roster with records loaded elsewhere, trusted as-is.
    #[must_use]
    pub fn with_records(mut self, records: impl IntoIterator<Item = R>) -> Self {
        for record in records {
            let id = self.next_id();
            self.records.push(StoredRecord { id, record });
        }
        self
    }

    /// Every stored record in collection order.
    #[must_use]
    pub fn records(&self) -> &[StoredRecord<R>] {
        &self.records
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the roster holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Page the view is showing.
    #[must_use]
    pub const fn current_page(&self) -> PageNumber {
        self.page
    }

    /// Records shown per page.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Pages needed for the current collection; zero when empty.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.records.len(), self.page_size)
    }

    /// Records visible on the current page.
    #[must_use]
    pub fn visible_page(&self) -> Page<StoredRecord<R>> {
        self.page_request().slice(&self.records)
    }

    /// Move the view to `page`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::PageOutOfRange`] when `page` is zero or past
    /// the last page. An empty roster still has page 1.
    pub fn go_to_page(&mut self, page: usize) -> Result<(), RecordError> {
        let last = self.total_pages().max(1);
        if page > last {
            return Err(RecordError::PageOutOfRange { page, last });
        }
        self.page =
            PageNumber::new(page).map_err(|_| RecordError::PageOutOfRange { page, last })?;
        Ok(())
    }

    /// Add form contents.
    #[must_use]
    pub const fn draft(&self) -> &R {
        &self.draft
    }

    /// Mutable access to the add form contents.
    pub fn draft_mut(&mut self) -> &mut R {
        &mut self.draft
    }

    /// Edit in progress, if any.
    #[must_use]
    pub const fn editing(&self) -> Option<&EditState<R>> {
        self.edit.as_ref()
    }

    /// Mutable access to the working copy of the record under edit.
    pub fn edit_mut(&mut self) -> Option<&mut R> {
        self.edit.as_mut().map(|edit| &mut edit.record)
    }

    /// Validate `draft` and append it to the roster.
    ///
    /// The draft becomes the form contents. Blank required fields fail fast;
    /// then the schema and the duplicate scan run against the whole
    /// collection. On success the form is reset, the view returns to page 1
    /// and a success notification is emitted.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingFields`], [`RecordError::Validation`]
    /// or [`RecordError::Duplicate`]; the collection is unchanged and the
    /// draft is kept for correction.
    pub fn add(&mut self, draft: R) -> Result<RecordId, RecordError> {
        self.draft = draft;

        let missing = self.draft.missing_required();
        if !missing.is_empty() {
            return Err(self.reject(RecordError::MissingFields { fields: missing }));
        }
        if let Err(error) = self.check(&self.draft, None) {
            return Err(self.reject(error));
        }

        let record = mem::take(&mut self.draft);
        let id = self.next_id();
        self.records.push(StoredRecord { id, record });
        self.page = PageNumber::FIRST;

        info!(kind = %R::KIND, %id, total = self.records.len(), "record added");
        self.notifications.notify(Notification::success(format!(
            "{} agregado correctamente",
            R::KIND.label()
        )));
        Ok(id)
    }

    /// Copy the record at `page_index` on the current page into the edit
    /// state, replacing any edit in progress.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::IndexOutOfRange`] when no record sits at that
    /// position.
    pub fn start_edit(&mut self, page_index: usize) -> Result<(), RecordError> {
        let index = self.resolve(page_index)?;
        let record = self.stored(index, page_index)?.record.clone();
        debug!(kind = %R::KIND, index, "edit started");
        self.edit = Some(EditState { index, record });
        Ok(())
    }

    /// Validate the working copy and write it back over the record at
    /// `page_index`.
    ///
    /// The duplicate scan skips the record's own slot. On failure the
    /// collection and the edit state are left untouched so the operator can
    /// retry.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NoActiveEdit`] or
    /// [`RecordError::EditTargetMismatch`] when the save does not match the
    /// edit in progress, or the validation and duplicate errors of
    /// [`RecordOperations::add`].
    pub fn save_edit(&mut self, page_index: usize) -> Result<(), RecordError> {
        let index = self.resolve(page_index)?;
        let edit = self.edit.as_ref().ok_or(RecordError::NoActiveEdit)?;
        if edit.index != index {
            return Err(RecordError::EditTargetMismatch {
                editing: edit.index,
                requested: index,
            });
        }
        if let Err(error) = self.check(&edit.record, Some(index)) {
            return Err(self.reject(error));
        }

        let Some(EditState { record, .. }) = self.edit.take() else {
            return Err(RecordError::NoActiveEdit);
        };
        let Some(slot) = self.records.get_mut(index) else {
            return Err(RecordError::IndexOutOfRange {
                page: self.page.get(),
                page_index,
            });
        };
        slot.record = record;

        info!(kind = %R::KIND, id = %slot.id, index, "record updated");
        self.notifications.notify(Notification::success(format!(
            "{} actualizado correctamente",
            R::KIND.label()
        )));
        Ok(())
    }

    /// Drop the edit in progress without validating it.
    pub fn cancel_edit(&mut self) {
        if self.edit.take().is_some() {
            debug!(kind = %R::KIND, "edit cancelled");
        }
    }

    /// Resolve the record at `page_index` and prepare a confirmation
    /// request for deleting it. Nothing is removed yet.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::IndexOutOfRange`] when no record sits at that
    /// position.
    pub fn request_delete(&self, page_index: usize) -> Result<PendingDeletion, RecordError> {
        let index = self.resolve(page_index)?;
        let stored = self.stored(index, page_index)?;
        let identity = stored.record.identity();
        let request = ConfirmationRequest::new(
            format!("¿Eliminar {}?", R::KIND.label().to_lowercase()),
            format!(
                "Se eliminará a {} (código {}). Esta acción no se puede deshacer.",
                stored.record.name(),
                identity.code
            ),
        );
        Ok(PendingDeletion {
            index,
            id: stored.id,
            request,
        })
    }

    /// Remove the record named by a confirmed `pending` deletion.
    ///
    /// Emits a warning followed by a success notification. The view steps
    /// back one page when its page no longer exists, and the edit state is
    /// cleared or shifted so it keeps pointing at the same record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::StaleDeletion`] when the slot no longer holds
    /// the record the deletion was requested for.
    pub fn commit_delete(
        &mut self,
        pending: PendingDeletion,
    ) -> Result<StoredRecord<R>, RecordError> {
        let PendingDeletion { index, id, .. } = pending;
        if self.records.get(index).map(StoredRecord::id) != Some(id) {
            warn!(kind = %R::KIND, index, %id, "stale deletion rejected");
            return Err(RecordError::StaleDeletion);
        }

        self.notifications.notify(Notification::warning(format!(
            "Eliminando {}…",
            R::KIND.label().to_lowercase()
        )));
        let removed = self.records.remove(index);
        self.reconcile_edit_after_removal(index);
        self.reconcile_page();

        info!(kind = %R::KIND, %id, index, total = self.records.len(), "record deleted");
        self.notifications.notify(Notification::success(format!(
            "{} eliminado correctamente",
            R::KIND.label()
        )));
        Ok(removed)
    }

    /// Discard a deletion the operator declined. Emits nothing.
    pub fn abort_delete(&self, pending: PendingDeletion) {
        debug!(kind = %R::KIND, index = pending.index, "deletion declined");
    }

    /// Ask `prompt` to confirm deleting the record at `page_index` and
    /// delete it when confirmed.
    ///
    /// The collection is not touched while the prompt is pending.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`RecordOperations::request_delete`] and
    /// [`RecordOperations::commit_delete`].
    pub async fn delete<P>(
        &mut self,
        page_index: usize,
        prompt: &P,
    ) -> Result<DeleteOutcome<R>, RecordError>
    where
        P: ConfirmationPrompt + ?Sized,
    {
        let pending = self.request_delete(page_index)?;
        if prompt.confirm(pending.request()).await {
            self.commit_delete(pending).map(DeleteOutcome::Deleted)
        } else {
            self.abort_delete(pending);
            Ok(DeleteOutcome::Cancelled)
        }
    }

    /// Validate an uploaded batch and append the rows that pass, in order.
    ///
    /// Emits one summary notification: success when every row was imported,
    /// warning when some were rejected, error when none were imported.
    pub fn import_batch(&mut self, rows: Vec<R>) -> BatchReport {
        let report = validate_batch(&rows, self.records.iter().map(StoredRecord::record));
        let accepted = report.accepted();

        for (index, record) in rows.into_iter().enumerate() {
            if accepted.contains(&index) {
                let id = self.next_id();
                self.records.push(StoredRecord { id, record });
            }
        }
        if !accepted.is_empty() {
            self.page = PageNumber::FIRST;
        }

        let imported = accepted.len();
        let rejected = report.rejected().len();
        info!(kind = %R::KIND, imported, rejected, "batch imported");
        let notification = match (imported, rejected) {
            (_, 0) => Notification::success(format!("{imported} registros importados")),
            (0, _) => Notification::error(format!(
                "Ningún registro importado; {rejected} filas con errores"
            )),
            _ => Notification::warning(format!(
                "{imported} registros importados; {rejected} filas con errores"
            )),
        };
        self.notifications.notify(notification);
        report
    }

    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    fn resolve(&self, page_index: usize) -> Result<usize, RecordError> {
        let out_of_range = RecordError::IndexOutOfRange {
            page: self.page.get(),
            page_index,
        };
        let index = match self.page_request().absolute_index(page_index) {
            Ok(index) => index,
            Err(PaginationError::IndexBeyondPage { .. }) => return Err(out_of_range),
            Err(error) => return Err(error.into()),
        };
        if index >= self.records.len() {
            warn!(kind = %R::KIND, page = self.page.get(), page_index, "index out of range");
            return Err(out_of_range);
        }
        debug!(page = self.page.get(), page_index, index, "resolved page index");
        Ok(index)
    }

    fn stored(&self, index: usize, page_index: usize) -> Result<&StoredRecord<R>, RecordError> {
        self.records
            .get(index)
            .ok_or(RecordError::IndexOutOfRange {
                page: self.page.get(),
                page_index,
            })
    }

    fn check(&self, record: &R, exclude_index: Option<usize>) -> Result<(), RecordError> {
        let violations = record.validate();
        if !violations.is_empty() {
            return Err(RecordError::Validation { violations });
        }
        let collisions = find_duplicates(
            record,
            self.records.iter().map(StoredRecord::record),
            exclude_index,
        );
        if !collisions.is_empty() {
            return Err(RecordError::Duplicate { collisions });
        }
        Ok(())
    }

    fn reject(&self, error: RecordError) -> RecordError {
        warn!(kind = %R::KIND, %error, "record operation rejected");
        self.notifications
            .notify(Notification::error(error.user_message()));
        error
    }

    fn next_id(&mut self) -> RecordId {
        let now = self.clock.utc().timestamp_millis();
        let id = match self.last_id {
            Some(RecordId(last)) if now <= last => RecordId(last.saturating_add(1)),
            _ => RecordId(now),
        };
        self.last_id = Some(id);
        id
    }

    fn reconcile_edit_after_removal(&mut self, removed: usize) {
        let Some(edit) = self.edit.as_mut() else {
            return;
        };
        if edit.index == removed {
            debug!(index = removed, "edited record deleted; edit cleared");
            self.edit = None;
        } else if edit.index > removed {
            edit.index -= 1;
        }
    }

    fn reconcile_page(&mut self) {
        if self.page.get() > self.total_pages()
            && let Some(previous) = self.page.previous()
        {
            self.page = previous;
        }
    }
}

impl<R: fmt::Debug, N> fmt::Debug for RecordOperations<R, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordOperations")
            .field("records", &self.records)
            .field("draft", &self.draft)
            .field("edit", &self.edit)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "operations_tests.rs"]
mod tests;
