//! Memo Notes — the Note bounded context.
//!
//! Responsible for the event-sourced Note aggregate, its commands and
//! events, and the command handlers that drive the write path.

pub mod application;
pub mod domain;
