//! Integration tests for `InMemoryEventStore`.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use memo_core::error::DomainError;
use memo_core::store::{EventStore, NewEvent};
use memo_event_store::InMemoryEventStore;
use memo_test_support::FixedClock;

/// Helper to build a `NewEvent` with sensible defaults.
fn make_new_event() -> NewEvent {
    NewEvent {
        event_id: Uuid::new_v4(),
        event_type: "TestEvent".to_string(),
        payload: serde_json::json!({"key": "value"}),
        correlation_id: Uuid::new_v4(),
        causation_id: Uuid::new_v4(),
    }
}

fn make_store() -> InMemoryEventStore {
    let fixed_now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
    InMemoryEventStore::new(Arc::new(FixedClock(fixed_now)))
}

// --- load ---

#[tokio::test]
async fn test_load_returns_not_found_for_nonexistent_aggregate() {
    let store = make_store();
    let aggregate_id = Uuid::new_v4();

    let result = store.load(aggregate_id).await;

    match result.unwrap_err() {
        DomainError::NotFound(id) => assert_eq!(id, aggregate_id),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

// --- append + load round-trip ---

#[tokio::test]
async fn test_append_and_load_single_event() {
    let store = make_store();
    let aggregate_id = Uuid::new_v4();
    let event = make_new_event();
    let expected_event_id = event.event_id;
    let expected_payload = event.payload.clone();
    let expected_correlation_id = event.correlation_id;
    let expected_causation_id = event.causation_id;
    let fixed_now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();

    let stored = store.append(aggregate_id, 0, &[event]).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].sequence_number, 1);

    let loaded = store.load(aggregate_id).await.unwrap();
    assert_eq!(loaded.len(), 1);

    let e = &loaded[0];
    assert_eq!(e.event_id, expected_event_id);
    assert_eq!(e.aggregate_id, aggregate_id);
    assert_eq!(e.event_type, "TestEvent");
    assert_eq!(e.payload, expected_payload);
    assert_eq!(e.sequence_number, 1);
    assert_eq!(e.correlation_id, expected_correlation_id);
    assert_eq!(e.causation_id, expected_causation_id);
    assert_eq!(e.occurred_at, fixed_now);
}

#[tokio::test]
async fn test_append_assigns_contiguous_sequence_numbers() {
    let store = make_store();
    let aggregate_id = Uuid::new_v4();

    let first = store
        .append(aggregate_id, 0, &[make_new_event(), make_new_event()])
        .await
        .unwrap();
    assert_eq!(first[0].sequence_number, 1);
    assert_eq!(first[1].sequence_number, 2);

    let second = store
        .append(aggregate_id, 2, &[make_new_event()])
        .await
        .unwrap();
    assert_eq!(second[0].sequence_number, 3);

    let loaded = store.load(aggregate_id).await.unwrap();
    let sequence: Vec<i64> = loaded.iter().map(|e| e.sequence_number).collect();
    assert_eq!(sequence, vec![1, 2, 3]);
}

// --- optimistic concurrency ---

#[tokio::test]
async fn test_append_with_stale_expected_version_returns_conflict() {
    let store = make_store();
    let aggregate_id = Uuid::new_v4();
    store
        .append(aggregate_id, 0, &[make_new_event()])
        .await
        .unwrap();

    let result = store.append(aggregate_id, 0, &[make_new_event()]).await;

    match result.unwrap_err() {
        DomainError::ConcurrencyConflict {
            aggregate_id: id,
            expected,
            actual,
        } => {
            assert_eq!(id, aggregate_id);
            assert_eq!(expected, 0);
            assert_eq!(actual, 1);
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_concurrent_appends_with_same_expected_version_have_one_winner() {
    let store = Arc::new(make_store());
    let aggregate_id = Uuid::new_v4();
    store
        .append(aggregate_id, 0, &[make_new_event()])
        .await
        .unwrap();

    let a = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.append(aggregate_id, 1, &[make_new_event()]).await })
    };
    let b = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.append(aggregate_id, 1, &[make_new_event()]).await })
    };

    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = if a.is_ok() { b } else { a };
    match loser.unwrap_err() {
        DomainError::ConcurrencyConflict {
            expected, actual, ..
        } => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_append_leaves_stream_untouched() {
    let store = make_store();
    let aggregate_id = Uuid::new_v4();
    store
        .append(aggregate_id, 0, &[make_new_event()])
        .await
        .unwrap();

    let _ = store
        .append(aggregate_id, 5, &[make_new_event(), make_new_event()])
        .await;

    let loaded = store.load(aggregate_id).await.unwrap();
    assert_eq!(loaded.len(), 1);
}

// --- load_from ---

#[tokio::test]
async fn test_load_from_returns_only_events_after_version() {
    let store = make_store();
    let aggregate_id = Uuid::new_v4();
    store
        .append(
            aggregate_id,
            0,
            &[make_new_event(), make_new_event(), make_new_event()],
        )
        .await
        .unwrap();

    let tail = store.load_from(aggregate_id, 1).await.unwrap();

    let sequence: Vec<i64> = tail.iter().map(|e| e.sequence_number).collect();
    assert_eq!(sequence, vec![2, 3]);
}

#[tokio::test]
async fn test_load_from_returns_empty_when_caught_up() {
    let store = make_store();
    let aggregate_id = Uuid::new_v4();
    store
        .append(aggregate_id, 0, &[make_new_event()])
        .await
        .unwrap();

    let tail = store.load_from(aggregate_id, 1).await.unwrap();

    assert!(tail.is_empty());
}

#[tokio::test]
async fn test_load_from_returns_not_found_for_unknown_aggregate() {
    let store = make_store();
    let aggregate_id = Uuid::new_v4();

    let result = store.load_from(aggregate_id, 0).await;

    match result.unwrap_err() {
        DomainError::NotFound(id) => assert_eq!(id, aggregate_id),
        other => panic!("expected NotFound, got {other:?}"),
    }
}
