//! Test bus — mock `EventPublisher` implementation for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use memo_core::bus::EventPublisher;
use memo_core::error::DomainError;
use memo_core::store::StoredEvent;

/// An event publisher that records everything handed to it.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    published: Mutex<Vec<StoredEvent>>,
}

impl RecordingEventPublisher {
    /// Create a new, empty recording publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all published events, in publish order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published_events(&self) -> Vec<StoredEvent> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, events: &[StoredEvent]) -> Result<(), DomainError> {
        self.published.lock().unwrap().extend_from_slice(events);
        Ok(())
    }
}
