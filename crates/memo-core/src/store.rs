//! Event store abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;

/// Stored representation of a domain event, as returned by the store.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Aggregate this event belongs to.
    pub aggregate_id: Uuid,
    /// Event type name for deserialization routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Sequence number within the aggregate stream. Starts at 1, gap-free,
    /// assigned by the store at append time.
    pub sequence_number: i64,
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Causation ID linking to the causing event/command.
    pub causation_id: Uuid,
    /// Timestamp assigned by the store at append time.
    pub occurred_at: chrono::DateTime<chrono::Utc>,
}

/// Producer-side event record handed to [`EventStore::append`].
///
/// Carries no sequence number and no timestamp: the store assigns both
/// inside the atomic append.
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Event type name for deserialization routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Causation ID linking to the causing event/command.
    pub causation_id: Uuid,
}

/// Append-only, per-aggregate-ordered event log. The single source of
/// truth for aggregate state.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append `events` to an aggregate stream with optimistic concurrency.
    /// `expected_version` is the last known sequence number; the
    /// check-and-append is atomic. On success the events are returned
    /// enriched with their assigned sequence numbers
    /// (`expected_version + 1 ..`) and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ConcurrencyConflict`] when the stream head
    /// does not equal `expected_version`, and [`DomainError::Storage`] for
    /// I/O failures.
    async fn append(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[NewEvent],
    ) -> Result<Vec<StoredEvent>, DomainError>;

    /// Load all events for a given aggregate, ordered by sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotFound`] when no events exist for the
    /// aggregate.
    async fn load(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError>;

    /// Load the events with sequence number greater than `after_version`,
    /// in order. Used for incremental projector catch-up; returns an empty
    /// vec when the reader is already caught up.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotFound`] when the aggregate has no events
    /// at all.
    async fn load_from(
        &self,
        aggregate_id: Uuid,
        after_version: i64,
    ) -> Result<Vec<StoredEvent>, DomainError>;
}
