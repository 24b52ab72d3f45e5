//! In-memory implementation of the `EventStore` trait.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use memo_core::clock::Clock;
use memo_core::error::DomainError;
use memo_core::store::{EventStore, NewEvent, StoredEvent};

/// In-memory event store. Each aggregate owns one append-only stream;
/// the check-and-append runs inside a single mutex-guarded critical
/// section, so at most one append per `(aggregate_id, expected_version)`
/// pair can succeed.
pub struct InMemoryEventStore {
    streams: Mutex<HashMap<Uuid, Vec<StoredEvent>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryEventStore {
    /// Creates a new, empty event store that stamps `occurred_at` from
    /// the given clock.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            streams: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn lock_streams(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Vec<StoredEvent>>>, DomainError> {
        self.streams
            .lock()
            .map_err(|_| DomainError::Storage("event store mutex poisoned".into()))
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[NewEvent],
    ) -> Result<Vec<StoredEvent>, DomainError> {
        let occurred_at = self.clock.now();
        let mut streams = self.lock_streams()?;
        let stream = streams.entry(aggregate_id).or_default();

        let actual = stream.last().map_or(0, |e| e.sequence_number);
        if actual != expected_version {
            tracing::debug!(
                %aggregate_id,
                expected = expected_version,
                actual,
                "append rejected: version mismatch"
            );
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        let stored: Vec<StoredEvent> = events
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
            .collect();

        stream.extend(stored.iter().cloned());
        tracing::debug!(
            %aggregate_id,
            count = stored.len(),
            new_version = stream.last().map_or(expected_version, |e| e.sequence_number),
            "events appended"
        );
        Ok(stored)
    }

    async fn load(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.lock_streams()?;
        match streams.get(&aggregate_id) {
            Some(stream) if !stream.is_empty() => Ok(stream.clone()),
            _ => Err(DomainError::NotFound(aggregate_id)),
        }
    }

    async fn load_from(
        &self,
        aggregate_id: Uuid,
        after_version: i64,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.lock_streams()?;
        match streams.get(&aggregate_id) {
            Some(stream) if !stream.is_empty() => Ok(stream
                .iter()
                .filter(|e| e.sequence_number > after_version)
                .cloned()
                .collect()),
            _ => Err(DomainError::NotFound(aggregate_id)),
        }
    }
}
