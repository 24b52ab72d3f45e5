//! Memo Event Store — append-only event log with optimistic concurrency.
//!
//! The shipped backend keeps streams in process memory behind the
//! [`memo_core::store::EventStore`] trait; a durable backend plugs in at
//! the same seam without touching the write or read side.

pub mod memory_event_store;

pub use memory_event_store::InMemoryEventStore;
