//! Domain events for the Note context.

use std::collections::BTreeSet;

use memo_core::event::DomainEvent;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted when a note is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteCreated {
    /// The verified owner of the note.
    pub owner_id: Uuid,
    /// The initial title.
    pub title: String,
    /// The initial content.
    pub content: String,
    /// The initial tag set.
    pub tags: BTreeSet<String>,
}

/// Emitted when a note's title changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteTitleChanged {
    /// The new title.
    pub title: String,
}

/// Emitted when a note's content changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteContentChanged {
    /// The new content.
    pub content: String,
}

/// Emitted when a note's tag set changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteTagsChanged {
    /// The full replacement tag set.
    pub tags: BTreeSet<String>,
}

/// Emitted when a note is logically deleted. The stream is retained for
/// audit; only read models treat the note as gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDeleted;

/// Event type identifier for [`NoteCreated`].
pub const NOTE_CREATED_EVENT_TYPE: &str = "note.created";

/// Event type identifier for [`NoteTitleChanged`].
pub const NOTE_TITLE_CHANGED_EVENT_TYPE: &str = "note.title_changed";

/// Event type identifier for [`NoteContentChanged`].
pub const NOTE_CONTENT_CHANGED_EVENT_TYPE: &str = "note.content_changed";

/// Event type identifier for [`NoteTagsChanged`].
pub const NOTE_TAGS_CHANGED_EVENT_TYPE: &str = "note.tags_changed";

/// Event type identifier for [`NoteDeleted`].
pub const NOTE_DELETED_EVENT_TYPE: &str = "note.deleted";

/// Event payload variants for the Note context. The set is closed: a new
/// event kind forces every `match` over it to be updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NoteEventKind {
    /// A note has been created.
    NoteCreated(NoteCreated),
    /// A note's title has changed.
    NoteTitleChanged(NoteTitleChanged),
    /// A note's content has changed.
    NoteContentChanged(NoteContentChanged),
    /// A note's tag set has changed.
    NoteTagsChanged(NoteTagsChanged),
    /// A note has been logically deleted.
    NoteDeleted(NoteDeleted),
}

impl DomainEvent for NoteEventKind {
    fn event_type(&self) -> &'static str {
        match self {
            NoteEventKind::NoteCreated(_) => NOTE_CREATED_EVENT_TYPE,
            NoteEventKind::NoteTitleChanged(_) => NOTE_TITLE_CHANGED_EVENT_TYPE,
            NoteEventKind::NoteContentChanged(_) => NOTE_CONTENT_CHANGED_EVENT_TYPE,
            NoteEventKind::NoteTagsChanged(_) => NOTE_TAGS_CHANGED_EVENT_TYPE,
            NoteEventKind::NoteDeleted(_) => NOTE_DELETED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(self).expect("NoteEventKind serialization is infallible")
    }
}
