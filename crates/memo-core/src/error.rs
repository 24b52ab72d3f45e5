//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    NotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// The bounded conflict-retry budget was exhausted.
    #[error("too many concurrency conflicts on aggregate {aggregate_id} after {attempts} attempts")]
    TooManyConflicts {
        /// The aggregate under contention.
        aggregate_id: Uuid,
        /// How many append attempts were made.
        attempts: u32,
    },

    /// The caller-supplied deadline elapsed before the command could be
    /// appended. No partial events were persisted.
    #[error("deadline exceeded while handling command for aggregate {aggregate_id}")]
    DeadlineExceeded {
        /// The aggregate the command targeted.
        aggregate_id: Uuid,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// The command targeted a note that has already been deleted.
    #[error("note already deleted: {0}")]
    AlreadyDeleted(Uuid),

    /// Replay invariant violated: the stored stream is out of order,
    /// double-creates, or starts mid-history. Never repaired silently.
    #[error("corrupt event stream for aggregate {aggregate_id}: {detail}")]
    CorruptEventStream {
        /// The aggregate whose stream is corrupt.
        aggregate_id: Uuid,
        /// What the replay fold observed.
        detail: String,
    },

    /// An infrastructure/persistence error.
    #[error("storage error: {0}")]
    Storage(String),
}
