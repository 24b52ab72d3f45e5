//! Denormalized note view and its event fold.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use memo_core::error::DomainError;
use memo_core::store::StoredEvent;
use memo_notes::domain::events::NoteEventKind;
use serde::Serialize;
use uuid::Uuid;

/// Read-only, query-optimized view of one note.
///
/// `version` tracks the highest folded sequence number and is monotonic:
/// the view may lag the event store but never leads it. A deleted note
/// stays in the cache as a tombstone so stale redeliveries cannot
/// resurrect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteView {
    /// The note identifier.
    pub id: Uuid,
    /// The note owner.
    pub owner_id: Uuid,
    /// Current title.
    pub title: String,
    /// Current content.
    pub content: String,
    /// Current tag set.
    pub tags: BTreeSet<String>,
    /// Timestamp of the last folded event.
    pub updated_at: DateTime<Utc>,
    /// Highest folded sequence number.
    pub version: i64,
    /// Tombstone flag for logically deleted notes.
    pub deleted: bool,
}

impl NoteView {
    /// Folds one stored event onto `current`, producing the next view.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] when the payload fails to
    /// deserialize and [`DomainError::CorruptEventStream`] when the event
    /// cannot legally follow `current` (non-creation first event, or a
    /// second creation).
    pub fn apply_stored(
        current: Option<NoteView>,
        event: &StoredEvent,
    ) -> Result<NoteView, DomainError> {
        let kind: NoteEventKind = serde_json::from_value(event.payload.clone())
            .map_err(|e| DomainError::Storage(format!("event deserialization failed: {e}")))?;

        match (current, kind) {
            (None, NoteEventKind::NoteCreated(created)) => Ok(NoteView {
                id: event.aggregate_id,
                owner_id: created.owner_id,
                title: created.title,
                content: created.content,
                tags: created.tags,
                updated_at: event.occurred_at,
                version: event.sequence_number,
                deleted: false,
            }),
            (None, _) => Err(DomainError::CorruptEventStream {
                aggregate_id: event.aggregate_id,
                detail: "first folded event is not a creation".into(),
            }),
            (Some(_), NoteEventKind::NoteCreated(_)) => Err(DomainError::CorruptEventStream {
                aggregate_id: event.aggregate_id,
                detail: "creation event folded twice".into(),
            }),
            (Some(mut view), NoteEventKind::NoteTitleChanged(changed)) => {
                view.title = changed.title;
                Ok(view.folded(event))
            }
            (Some(mut view), NoteEventKind::NoteContentChanged(changed)) => {
                view.content = changed.content;
                Ok(view.folded(event))
            }
            (Some(mut view), NoteEventKind::NoteTagsChanged(changed)) => {
                view.tags = changed.tags;
                Ok(view.folded(event))
            }
            (Some(mut view), NoteEventKind::NoteDeleted(_)) => {
                view.deleted = true;
                Ok(view.folded(event))
            }
        }
    }

    fn folded(mut self, event: &StoredEvent) -> NoteView {
        self.updated_at = event.occurred_at;
        self.version = event.sequence_number;
        self
    }
}
