//! Tests for the record operations controller.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::duplicates::Collision;
use crate::domain::ports::{
    FixedConfirmationPrompt, MockConfirmationPrompt, MockNotificationSink,
    RecordingNotificationSink,
};
use crate::domain::notification::Severity;
use crate::domain::record::{Field, StudentRecord, UserRecord};
use crate::domain::validation::Violation;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

fn user(n: usize) -> UserRecord {
    let code = format!("{}", 1_000_000 + n);
    UserRecord::new(
        code.clone(),
        format!("Usuario {n:02}"),
        code,
        format!("usuario{n}@ufps.edu.co"),
    )
}

type Users = RecordOperations<UserRecord, RecordingNotificationSink>;

fn roster_of(count: usize) -> (Users, Arc<RecordingNotificationSink>) {
    let sink = Arc::new(RecordingNotificationSink::new());
    let ops = RecordOperations::new(Arc::clone(&sink), fixture_clock(), PageSize::default())
        .with_records((0..count).map(user));
    (ops, sink)
}

#[fixture]
fn empty() -> (Users, Arc<RecordingNotificationSink>) {
    roster_of(0)
}

fn severities(sink: &RecordingNotificationSink) -> Vec<Severity> {
    sink.delivered().iter().map(Notification::severity).collect()
}

fn codes(ops: &Users) -> Vec<String> {
    ops.records()
        .iter()
        .map(|stored| stored.record().code.clone())
        .collect()
}

#[rstest]
fn add_appends_resets_draft_and_notifies(empty: (Users, Arc<RecordingNotificationSink>)) {
    let (mut ops, sink) = empty;
    ops.draft_mut().name = "borrador".to_owned();

    ops.add(user(1)).expect("valid record is added");

    assert_eq!(codes(&ops), vec!["1000001"]);
    assert_eq!(ops.draft(), &UserRecord::default());
    assert_eq!(ops.current_page(), PageNumber::FIRST);
    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].severity(), Severity::Success);
    assert_eq!(delivered[0].message(), "Usuario agregado correctamente");
}

#[rstest]
fn add_returns_to_the_first_page() {
    let (mut ops, _sink) = roster_of(15);
    ops.go_to_page(2).expect("page 2 exists");

    ops.add(user(99)).expect("valid record is added");

    assert_eq!(ops.current_page(), PageNumber::FIRST);
    assert_eq!(ops.len(), 16);
}

#[rstest]
fn add_with_blank_fields_keeps_the_draft(empty: (Users, Arc<RecordingNotificationSink>)) {
    let (mut ops, sink) = empty;
    let draft = UserRecord::new("  ", "Ana Li", "", "ana@ufps.edu.co");

    let error = ops.add(draft.clone()).expect_err("blank fields are rejected");

    assert_eq!(
        error,
        RecordError::MissingFields {
            fields: vec![Field::Code, Field::DocumentNumber],
        }
    );
    assert!(ops.is_empty());
    assert_eq!(ops.draft(), &draft);
    assert_eq!(severities(&sink), vec![Severity::Error]);
}

#[rstest]
fn add_reports_every_schema_violation(empty: (Users, Arc<RecordingNotificationSink>)) {
    let (mut ops, sink) = empty;
    let draft = UserRecord::new("123", "Al", "1234567", "al@gmail.com");

    let Err(RecordError::Validation { violations }) = ops.add(draft) else {
        panic!("expected a validation error");
    };

    let fields: Vec<Field> = violations.iter().map(Violation::field).collect();
    assert_eq!(fields, vec![Field::Code, Field::Name, Field::Email]);
    assert!(ops.is_empty());
    assert!(
        sink.delivered()[0]
            .message()
            .starts_with("Errores de validación: code: ")
    );
}

#[rstest]
fn add_rejects_duplicate_codes_without_mutating() {
    let (mut ops, sink) = roster_of(1);
    let mut draft = user(1);
    draft.code = "1000000".to_owned();

    let error = ops.add(draft).expect_err("duplicate code is rejected");

    assert_eq!(
        error,
        RecordError::Duplicate {
            collisions: vec![Collision::Code("1000000".to_owned())],
        }
    );
    assert_eq!(ops.len(), 1);
    assert_eq!(
        sink.delivered()[0].message(),
        "Registro duplicado: código 1000000"
    );
}

#[rstest]
fn add_notifies_through_the_sink_port() {
    let mut sink = MockNotificationSink::new();
    sink.expect_notify()
        .withf(|notification| notification.severity() == Severity::Success)
        .times(1)
        .return_const(());
    let mut ops: RecordOperations<UserRecord, _> =
        RecordOperations::new(Arc::new(sink), fixture_clock(), PageSize::default());

    ops.add(user(7)).expect("valid record is added");
}

#[rstest]
fn ids_stay_unique_when_the_clock_stands_still(empty: (Users, Arc<RecordingNotificationSink>)) {
    let (mut ops, _sink) = empty;

    let first = ops.add(user(1)).expect("first add");
    let second = ops.add(user(2)).expect("second add");

    assert_eq!(first.get(), fixture_timestamp().timestamp_millis());
    assert_eq!(second.get(), first.get() + 1);
}

#[rstest]
fn page_relative_indices_resolve_against_the_current_page() {
    let (mut ops, _sink) = roster_of(25);
    ops.go_to_page(2).expect("page 2 exists");

    ops.start_edit(3).expect("record 13 exists");

    let edit = ops.editing().expect("edit in progress");
    assert_eq!(edit.index(), 13);
    assert_eq!(edit.record(), &user(13));
}

#[rstest]
fn out_of_range_indices_are_not_notified() {
    let mut sink = MockNotificationSink::new();
    sink.expect_notify().times(0);
    let mut ops: RecordOperations<UserRecord, _> =
        RecordOperations::new(Arc::new(sink), fixture_clock(), PageSize::default())
            .with_records((0..12).map(user));
    ops.go_to_page(2).expect("page 2 exists");

    assert_eq!(
        ops.start_edit(2),
        Err(RecordError::IndexOutOfRange {
            page: 2,
            page_index: 2,
        })
    );
    assert_eq!(
        ops.request_delete(10),
        Err(RecordError::IndexOutOfRange {
            page: 2,
            page_index: 10,
        })
    );
}

#[rstest]
fn save_edit_ignores_the_records_own_slot() {
    let (mut ops, sink) = roster_of(3);
    ops.start_edit(1).expect("record exists");
    if let Some(record) = ops.edit_mut() {
        record.name = "Nombre Corregido".to_owned();
    }

    ops.save_edit(1).expect("unchanged identity is not a duplicate");

    assert_eq!(ops.records()[1].record().name, "Nombre Corregido");
    assert!(ops.editing().is_none());
    assert_eq!(severities(&sink), vec![Severity::Success]);
}

#[rstest]
fn failed_save_keeps_the_edit_in_progress() {
    let (mut ops, sink) = roster_of(3);
    ops.start_edit(1).expect("record exists");
    if let Some(record) = ops.edit_mut() {
        record.email = "USUARIO2@ufps.edu.co".to_owned();
    }

    let error = ops.save_edit(1).expect_err("email collides with record 2");

    assert!(matches!(error, RecordError::Duplicate { .. }));
    assert_eq!(ops.records()[1].record(), &user(1));
    assert_eq!(
        ops.editing().map(|edit| edit.record().email.as_str()),
        Some("USUARIO2@ufps.edu.co")
    );
    assert_eq!(severities(&sink), vec![Severity::Error]);
}

#[rstest]
fn save_requires_a_matching_edit() {
    let (mut ops, _sink) = roster_of(3);
    assert_eq!(ops.save_edit(0), Err(RecordError::NoActiveEdit));

    ops.start_edit(0).expect("record exists");
    assert_eq!(
        ops.save_edit(2),
        Err(RecordError::EditTargetMismatch {
            editing: 0,
            requested: 2,
        })
    );

    ops.cancel_edit();
    assert!(ops.editing().is_none());
}

#[tokio::test]
async fn confirmed_delete_warns_then_succeeds() {
    let (mut ops, sink) = roster_of(3);
    let mut prompt = MockConfirmationPrompt::new();
    prompt
        .expect_confirm()
        .withf(|request| request.message().contains("1000001"))
        .times(1)
        .return_const(true);

    let outcome = ops.delete(1, &prompt).await.expect("delete succeeds");

    let DeleteOutcome::Deleted(removed) = outcome else {
        panic!("expected the record to be deleted");
    };
    assert_eq!(removed.record(), &user(1));
    assert_eq!(codes(&ops), vec!["1000000", "1000002"]);
    assert_eq!(severities(&sink), vec![Severity::Warning, Severity::Success]);
}

#[tokio::test]
async fn declined_delete_changes_nothing() {
    let (mut ops, sink) = roster_of(3);

    let outcome = ops
        .delete(0, &FixedConfirmationPrompt::declining())
        .await
        .expect("declining is not an error");

    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(ops.len(), 3);
    assert!(sink.delivered().is_empty());
}

#[rstest]
fn deleting_the_last_record_of_a_page_steps_back() {
    let (mut ops, _sink) = roster_of(11);
    ops.go_to_page(2).expect("page 2 exists");

    let pending = ops.request_delete(0).expect("record 10 exists");
    ops.commit_delete(pending).expect("delete succeeds");

    assert_eq!(ops.current_page().get(), 1);
    assert_eq!(ops.total_pages(), 1);
    assert_eq!(ops.visible_page().items().len(), 10);
}

#[rstest]
fn deleting_the_only_record_stays_on_page_one() {
    let (mut ops, _sink) = roster_of(1);

    let pending = ops.request_delete(0).expect("record exists");
    ops.commit_delete(pending).expect("delete succeeds");

    assert!(ops.is_empty());
    assert_eq!(ops.current_page(), PageNumber::FIRST);
    assert_eq!(ops.total_pages(), 0);
}

#[rstest]
#[case::before_the_edit(0, Some(1))]
#[case::the_edited_record(2, None)]
#[case::after_the_edit(3, Some(2))]
fn delete_keeps_the_edit_pointing_at_its_record(
    #[case] deleted: usize,
    #[case] expected: Option<usize>,
) {
    let (mut ops, _sink) = roster_of(4);
    ops.start_edit(2).expect("record exists");

    let pending = ops.request_delete(deleted).expect("record exists");
    ops.commit_delete(pending).expect("delete succeeds");

    assert_eq!(ops.editing().map(EditState::index), expected);
    if let Some(edit) = ops.editing() {
        assert_eq!(edit.record(), &user(2));
    }
}

#[rstest]
fn stale_deletions_are_refused() {
    let (mut ops, sink) = roster_of(3);
    let first = ops.request_delete(0).expect("record exists");
    let second = ops.request_delete(0).expect("record exists");

    ops.commit_delete(first).expect("first delete succeeds");
    sink.drain();

    assert_eq!(ops.commit_delete(second), Err(RecordError::StaleDeletion));
    assert_eq!(ops.len(), 2);
    assert!(sink.delivered().is_empty());
}

#[rstest]
fn aborted_deletions_are_silent() {
    let (ops, sink) = roster_of(2);
    let pending = ops.request_delete(1).expect("record exists");
    assert_eq!(pending.index(), 1);
    assert_eq!(pending.request().title(), "¿Eliminar usuario?");

    ops.abort_delete(pending);

    assert_eq!(ops.len(), 2);
    assert!(sink.delivered().is_empty());
}

#[rstest]
#[case(0)]
#[case(3)]
fn navigation_is_bounded(#[case] page: usize) {
    let (mut ops, _sink) = roster_of(15);

    assert_eq!(
        ops.go_to_page(page),
        Err(RecordError::PageOutOfRange { page, last: 2 })
    );
    assert_eq!(ops.current_page(), PageNumber::FIRST);
}

#[rstest]
fn empty_rosters_still_show_page_one(empty: (Users, Arc<RecordingNotificationSink>)) {
    let (mut ops, _sink) = empty;

    ops.go_to_page(1).expect("page 1 always exists");
    let page = ops.visible_page();

    assert!(page.items().is_empty());
    assert_eq!(page.total_pages(), 0);
}

#[rstest]
fn import_batch_appends_accepted_rows_and_summarises() {
    let (mut ops, sink) = roster_of(1);
    let rows = vec![user(5), user(0), user(6)];

    let report = ops.import_batch(rows);

    assert_eq!(report.accepted(), &[0, 2]);
    assert_eq!(codes(&ops), vec!["1000000", "1000005", "1000006"]);
    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].severity(), Severity::Warning);
    assert_eq!(
        delivered[0].message(),
        "2 registros importados; 1 filas con errores"
    );
}

#[rstest]
#[case(vec![user(1), user(2)], Severity::Success)]
#[case(vec![user(0)], Severity::Error)]
fn import_batch_summary_severity(#[case] rows: Vec<UserRecord>, #[case] expected: Severity) {
    let (mut ops, sink) = roster_of(1);

    ops.import_batch(rows);

    assert_eq!(severities(&sink), vec![expected]);
}

#[rstest]
fn students_share_codes_across_groups() {
    let sink = Arc::new(RecordingNotificationSink::new());
    let mut ops: RecordOperations<StudentRecord, _> =
        RecordOperations::new(Arc::clone(&sink), fixture_clock(), PageSize::default());
    let profile = user(1);

    ops.add(StudentRecord::new(profile.clone(), "1154306-A-01-2025"))
        .expect("first enrolment");
    let mut other_group = StudentRecord::new(profile.clone(), "1154306-B-01-2025");
    other_group.profile.email = "otro@ufps.edu.co".to_owned();
    ops.add(other_group).expect("same code in another group");

    let mut same_group = StudentRecord::new(profile, "1154306-A-01-2025");
    same_group.profile.email = "tercero@ufps.edu.co".to_owned();
    let error = ops.add(same_group).expect_err("same group collides");

    assert_eq!(
        error,
        RecordError::Duplicate {
            collisions: vec![
                Collision::Code("1000001".to_owned()),
                Collision::DocumentNumber("1000001".to_owned()),
            ],
        }
    );
    assert_eq!(
        severities(&sink),
        vec![Severity::Success, Severity::Success, Severity::Error]
    );
}

#[rstest]
fn student_documents_with_separators_are_duplicates_in_the_same_group() {
    let sink = Arc::new(RecordingNotificationSink::new());
    let mut ops: RecordOperations<StudentRecord, _> =
        RecordOperations::new(Arc::clone(&sink), fixture_clock(), PageSize::default());
    ops.add(StudentRecord::new(
        UserRecord::new("1234567", "Ana Li", "1234567", "ana@ufps.edu.co"),
        "1154306-B-02-2025",
    ))
    .expect("first enrolment");

    let error = ops
        .add(StudentRecord::new(
            UserRecord::new("7654321", "Luis Paz", "1.234.567", "luis@ufps.edu.co"),
            "1154306-B-02-2025",
        ))
        .expect_err("same document in the same group collides");

    assert_eq!(
        error,
        RecordError::Duplicate {
            collisions: vec![Collision::DocumentNumber("1234567".to_owned())],
        }
    );
    assert_eq!(ops.len(), 1);
    assert_eq!(
        sink.delivered().last().map(Notification::message),
        Some("Registro duplicado: documento 1234567")
    );
}
