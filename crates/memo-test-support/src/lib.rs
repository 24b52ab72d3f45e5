//! Shared test mocks and utilities for the memo event-sourcing core.

mod bus;
mod clock;
mod store;

pub use bus::RecordingEventPublisher;
pub use clock::FixedClock;
pub use store::{EmptyEventStore, FailingEventStore, RecordingEventStore};
