#![allow(clippy::unwrap_used, clippy::expect_used)]

use bikeshop_core::core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND,
    FIELD_ROW_COUNT,
};
use bikeshop_core::errors::{not_found, ExErrorKind, ValidationError};
use bikeshop_core::logging_facility::test_capture::init_test_capture;
use bikeshop_core::{
    log_op_end, log_op_error, log_op_start, ExError, MemoryStore, OwnerController, Repository,
};

mod common;

use common::owner_form;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let events = capture.events();
    let start_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert!(
        !start_events.is_empty(),
        "Should have captured at least one start event"
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events = capture.events_for(op_name);
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(end_events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = not_found("bike", 7);
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(error_events.len(), 1, "Should have exactly one error event");

    let error_event = &error_events[0];
    assert_eq!(error_event.level, tracing::Level::ERROR);
    assert_eq!(
        error_event.field(FIELD_ERR_KIND),
        Some(ExErrorKind::NotFound.name())
    );
    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("1403"));
}

#[test]
fn test_validation_errors_log_at_warn() {
    let capture = init_test_capture();
    let op_name = "test_validation_warn_unique_4";

    let err: bikeshop_core::ExError = ValidationError::Phone {
        value: "12".to_string(),
    }
    .into();
    log_op_error!(op_name, &err, duration_ms = 0);

    let events = capture.events_for(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, tracing::Level::WARN);
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("13"));
}

#[test]
fn test_controller_failure_emits_start_then_end_error() {
    let capture = init_test_capture();
    let mut store = MemoryStore::new();
    let mut owners = OwnerController::new();

    let phone = "612";
    owners
        .insert(&mut store, &owner_form().phone(phone))
        .unwrap_err();

    // Other tests share the global capture, so look for our code only
    let events = capture.events_for("owner.insert");
    assert!(events.iter().any(|e| e.event.as_deref() == Some(EVENT_START)));
    assert!(events.iter().any(|e| {
        e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("13")
    }));
}

#[test]
fn test_owner_contact_details_are_redacted() {
    let capture = init_test_capture();
    let mut store = MemoryStore::new();
    let mut owners = OwnerController::new();
    let form = owner_form().phone("677123987").email("redact.me@example.com");

    owners.insert(&mut store, &form).unwrap();

    for event in capture.events_for("owner.insert") {
        for value in event.fields.values() {
            assert!(!value.contains("677123987"));
            assert!(!value.contains("redact.me@example.com"));
        }
    }
    capture.assert_event_exists("owner.insert", EVENT_END);
}

#[test]
fn test_macros_work_as_match_arm_expressions() {
    let capture = init_test_capture();
    let op_name = "test_match_arm_unique_5";

    let outcomes: [Result<(), ExError>; 2] = [Ok(()), Err(not_found("owner", 3))];
    for outcome in &outcomes {
        match outcome {
            Ok(()) => log_op_end!(op_name, duration_ms = 1),
            Err(err) => log_op_error!(op_name, err, duration_ms = 1),
        }
    }

    let events = capture.events_for(op_name);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[1].event.as_deref(), Some(EVENT_END_ERROR));
}

#[test]
fn test_load_end_event_carries_row_count() {
    let capture = init_test_capture();
    let mut store = MemoryStore::new();
    for _ in 0..3 {
        let mut owner = common::sample_owner();
        store.save(&mut owner).unwrap();
    }
    let mut owners = OwnerController::new();

    let listed = owners.load(&store).unwrap().len();

    assert_eq!(listed, 3);
    assert!(capture
        .events_for("owner.load")
        .iter()
        .any(|e| e.event.as_deref() == Some(EVENT_END) && e.field(FIELD_ROW_COUNT) == Some("3")));
}
