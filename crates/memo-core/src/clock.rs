//! Time source abstraction.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// The event store stamps `occurred_at` on each event through this trait
/// at append time, so tests can pin timestamps with a fixed clock and
/// replay stays deterministic.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
