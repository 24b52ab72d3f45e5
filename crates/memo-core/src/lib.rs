//! Memo Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the write and
//! read sides depend on. It contains no infrastructure code.

pub mod aggregate;
pub mod bus;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod store;
