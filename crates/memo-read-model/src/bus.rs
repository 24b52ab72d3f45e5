//! In-process event bus: an unbounded channel drained by one worker.
//!
//! Publishing is an enqueue and never blocks the write path; a single
//! worker delivers in enqueue order, which preserves per-aggregate
//! sequence order. Cross-aggregate ordering is not guaranteed and not
//! needed.

use std::sync::Arc;

use async_trait::async_trait;
use memo_core::bus::{EventPublisher, EventSubscriber};
use memo_core::error::DomainError;
use memo_core::store::StoredEvent;
use tokio::sync::mpsc;

/// Write-side handle: cheap to clone, enqueues onto the worker's channel.
#[derive(Debug, Clone)]
pub struct InProcessEventBus {
    tx: mpsc::UnboundedSender<StoredEvent>,
}

impl InProcessEventBus {
    /// Creates a bus and its worker. Register subscribers on the worker,
    /// then drive it with [`EventBusWorker::run`] (usually on a spawned
    /// task).
    #[must_use]
    pub fn new() -> (Self, EventBusWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self { tx },
            EventBusWorker {
                rx,
                subscribers: Vec::new(),
            },
        )
    }
}

#[async_trait]
impl EventPublisher for InProcessEventBus {
    async fn publish(&self, events: &[StoredEvent]) -> Result<(), DomainError> {
        for event in events {
            self.tx
                .send(event.clone())
                .map_err(|_| DomainError::Storage("event bus worker has shut down".into()))?;
        }
        Ok(())
    }
}

/// Consumer side of the bus. Owns the channel receiver and the subscriber
/// list; `run` drains the channel until every publisher handle is gone.
pub struct EventBusWorker {
    rx: mpsc::UnboundedReceiver<StoredEvent>,
    subscribers: Vec<Arc<dyn EventSubscriber>>,
}

impl EventBusWorker {
    /// Registers a subscriber. Every published event is delivered to all
    /// subscribers; one failing does not stop the others.
    pub fn subscribe(&mut self, subscriber: Arc<dyn EventSubscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Delivers events until the channel closes.
    pub async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            for subscriber in &self.subscribers {
                if let Err(err) = subscriber.on_event(&event).await {
                    tracing::warn!(
                        aggregate_id = %event.aggregate_id,
                        sequence_number = event.sequence_number,
                        error = %err,
                        "subscriber failed to process event"
                    );
                }
            }
        }
    }
}
