//! Domain layer for the Note context.

pub mod aggregates;
pub mod commands;
pub mod events;
