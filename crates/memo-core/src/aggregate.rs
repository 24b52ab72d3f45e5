//! Aggregate root abstraction.

use uuid::Uuid;

use crate::error::DomainError;
use crate::event::DomainEvent;

/// Trait for aggregate roots that reconstitute from event history.
///
/// An aggregate instance lives for one command-handler invocation: it is
/// rebuilt from its stream, decides, and is discarded. It is never cached
/// or shared across invocations.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the current version (highest applied sequence number).
    fn version(&self) -> i64;

    /// Apply an event to mutate internal state (used during replay).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::CorruptEventStream`] when the event cannot
    /// legally follow the current state.
    fn apply(&mut self, event: &Self::Event) -> Result<(), DomainError>;

    /// Returns uncommitted events produced by command handling.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Clears uncommitted events after persistence.
    fn clear_uncommitted_events(&mut self);
}
