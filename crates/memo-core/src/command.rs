//! Command abstractions.

use uuid::Uuid;

/// Trait that all commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// The verified owner on whose behalf the command runs. Identity is
    /// established by the excluded authentication layer, never here.
    fn owner_id(&self) -> Uuid;
}
