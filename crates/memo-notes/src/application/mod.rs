//! Application layer for the Note context.

pub mod command_handlers;
