//! Domain event abstractions.

use serde_json::Value;

/// Trait that all domain event payloads implement.
///
/// A domain event describes an immutable fact about one aggregate. Note
/// that sequence numbers and timestamps are deliberately absent: both are
/// assigned by the event store at append time, never by the producer.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name (used for serialization routing).
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> Value;
}
