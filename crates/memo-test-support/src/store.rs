//! Test stores — mock `EventStore` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use memo_core::error::DomainError;
use memo_core::store::{EventStore, NewEvent, StoredEvent};
use uuid::Uuid;

fn assign(
    aggregate_id: Uuid,
    expected_version: i64,
    events: &[NewEvent],
    occurred_at: DateTime<Utc>,
) -> Vec<StoredEvent> {
    events
        .iter()
        .enumerate()
        .map(|(i, event)| StoredEvent {
            event_id: event.event_id,
            aggregate_id,
            event_type: event.event_type.clone(),
            payload: event.payload.clone(),
            sequence_number: expected_version + 1 + i as i64,
            correlation_id: event.correlation_id,
            causation_id: event.causation_id,
            occurred_at,
        })
        .collect()
}

/// An event store that records all `append` calls and serves a configured
/// event list from `load`. Appends always succeed and assign sequence
/// numbers the way the real store does.
#[derive(Debug)]
pub struct RecordingEventStore {
    load_result: Mutex<Vec<StoredEvent>>,
    appended: Mutex<Vec<(Uuid, i64, Vec<StoredEvent>)>>,
    now: DateTime<Utc>,
}

impl RecordingEventStore {
    /// Create a recording store that returns `load_result` from every
    /// `load` call (or `NotFound` when the list is empty) and stamps
    /// appended events with `now`.
    #[must_use]
    pub fn new(load_result: Vec<StoredEvent>, now: DateTime<Utc>) -> Self {
        Self {
            load_result: Mutex::new(load_result),
            appended: Mutex::new(Vec::new()),
            now,
        }
    }

    /// Returns a snapshot of all events that were appended.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<(Uuid, i64, Vec<StoredEvent>)> {
        self.appended.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventStore for RecordingEventStore {
    async fn append(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[NewEvent],
    ) -> Result<Vec<StoredEvent>, DomainError> {
        let stored = assign(aggregate_id, expected_version, events, self.now);
        self.appended
            .lock()
            .unwrap()
            .push((aggregate_id, expected_version, stored.clone()));
        Ok(stored)
    }

    async fn load(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let events = self.load_result.lock().unwrap().clone();
        if events.is_empty() {
            return Err(DomainError::NotFound(aggregate_id));
        }
        Ok(events)
    }

    async fn load_from(
        &self,
        aggregate_id: Uuid,
        after_version: i64,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        let events = self.load(aggregate_id).await?;
        Ok(events
            .into_iter()
            .filter(|e| e.sequence_number > after_version)
            .collect())
    }
}

/// An event store with no history: every load reports `NotFound` and
/// appends silently succeed. Useful for testing "aggregate not found"
/// scenarios and creation commands.
#[derive(Debug)]
pub struct EmptyEventStore;

#[async_trait]
impl EventStore for EmptyEventStore {
    async fn append(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[NewEvent],
    ) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(assign(aggregate_id, expected_version, events, Utc::now()))
    }

    async fn load(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::NotFound(aggregate_id))
    }

    async fn load_from(
        &self,
        aggregate_id: Uuid,
        _after_version: i64,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::NotFound(aggregate_id))
    }
}

/// An event store that always returns a storage error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingEventStore;

#[async_trait]
impl EventStore for FailingEventStore {
    async fn append(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[NewEvent],
    ) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::Storage("connection refused".into()))
    }

    async fn load(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::Storage("connection refused".into()))
    }

    async fn load_from(
        &self,
        _aggregate_id: Uuid,
        _after_version: i64,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::Storage("connection refused".into()))
    }
}
