//! Memo Read Model — the CQRS read side.
//!
//! Events appended by the write path arrive over the in-process bus, the
//! projector folds them into denormalized [`view::NoteView`] entries, and
//! query handlers serve reads from the view cache. The read side lags the
//! event store but never leads it.

pub mod bus;
pub mod cache;
pub mod projector;
pub mod queries;
pub mod view;
