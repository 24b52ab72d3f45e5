//! Event bus abstractions.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::store::StoredEvent;

/// Write-side handle to the event bus. Command handlers publish freshly
/// appended events here; the append is already durable by the time
/// `publish` runs, so a publish failure never rolls it back.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hand the events to the bus for delivery to all subscribers.
    /// Events for one aggregate must be published in sequence order.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] when the bus can no longer accept
    /// events (e.g. its worker has shut down).
    async fn publish(&self, events: &[StoredEvent]) -> Result<(), DomainError>;
}

/// A consumer of published events (currently: the read-model projector).
///
/// Delivery is at-least-once; implementations must tolerate duplicates.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Process one delivered event.
    ///
    /// # Errors
    ///
    /// A subscriber error is isolated by the bus: it is logged and does
    /// not stop delivery to other subscribers.
    async fn on_event(&self, event: &StoredEvent) -> Result<(), DomainError>;
}
