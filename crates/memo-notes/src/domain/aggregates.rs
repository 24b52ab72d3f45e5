//! The Note aggregate root.

use std::collections::BTreeSet;

use memo_core::aggregate::AggregateRoot;
use memo_core::error::DomainError;
use memo_core::store::StoredEvent;
use uuid::Uuid;

use super::events::{
    NoteContentChanged, NoteCreated, NoteDeleted, NoteEventKind, NoteTagsChanged, NoteTitleChanged,
};

/// Maximum title length in characters.
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum content length in characters.
pub const CONTENT_MAX_LEN: usize = 100_000;

/// Maximum number of tags on one note.
pub const MAX_TAGS: usize = 32;

/// Maximum length of a single tag in characters.
pub const TAG_MAX_LEN: usize = 64;

/// The aggregate root for a note.
///
/// State is exactly the fold of the note's event stream: decision methods
/// only validate and buffer events, field mutation happens in [`apply`]
/// during replay. An instance lives for one command-handler invocation.
///
/// [`apply`]: AggregateRoot::apply
#[derive(Debug)]
pub struct NoteAggregate {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Owner of the note; `None` until the creation event is applied.
    pub owner_id: Option<Uuid>,
    /// Current title.
    pub title: String,
    /// Current content.
    pub content: String,
    /// Current tag set.
    pub tags: BTreeSet<String>,
    /// Whether the note has been logically deleted.
    pub deleted: bool,
    /// Current version (highest applied sequence number).
    pub version: i64,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<NoteEventKind>,
}

impl NoteAggregate {
    /// Creates an empty aggregate at version 0.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            owner_id: None,
            title: String::new(),
            content: String::new(),
            tags: BTreeSet::new(),
            deleted: false,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Rebuilds a note by folding its stored events left to right.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::CorruptEventStream`] when the stream is out
    /// of sequence, double-creates, or starts with a non-creation event,
    /// and [`DomainError::Storage`] when a payload fails to deserialize.
    pub fn replay(note_id: Uuid, events: &[StoredEvent]) -> Result<Self, DomainError> {
        let mut note = Self::new(note_id);
        for stored in events {
            if stored.aggregate_id != note_id {
                return Err(DomainError::CorruptEventStream {
                    aggregate_id: note_id,
                    detail: format!("stream contains event for aggregate {}", stored.aggregate_id),
                });
            }
            if stored.sequence_number != note.version + 1 {
                return Err(DomainError::CorruptEventStream {
                    aggregate_id: note_id,
                    detail: format!(
                        "expected sequence {}, found {}",
                        note.version + 1,
                        stored.sequence_number
                    ),
                });
            }
            let kind: NoteEventKind =
                serde_json::from_value(stored.payload.clone()).map_err(|e| {
                    DomainError::Storage(format!("event deserialization failed: {e}"))
                })?;
            note.apply(&kind)?;
        }
        Ok(note)
    }

    /// Decides the creation of this note. Valid only on a fresh aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] on bad input or when the note
    /// already exists.
    pub fn create(
        &mut self,
        owner_id: Uuid,
        title: &str,
        content: &str,
        tags: BTreeSet<String>,
    ) -> Result<(), DomainError> {
        if self.owner_id.is_some() || self.version > 0 {
            return Err(DomainError::Validation("note already exists".into()));
        }
        validate_title(title)?;
        validate_content(content)?;
        validate_tags(&tags)?;
        self.uncommitted_events
            .push(NoteEventKind::NoteCreated(NoteCreated {
                owner_id,
                title: title.to_owned(),
                content: content.to_owned(),
                tags,
            }));
        Ok(())
    }

    /// Decides a title change.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] on bad input or owner mismatch
    /// and [`DomainError::AlreadyDeleted`] when the note is deleted.
    pub fn change_title(&mut self, owner_id: Uuid, new_title: &str) -> Result<(), DomainError> {
        self.ensure_writable(owner_id)?;
        validate_title(new_title)?;
        if self.title == new_title {
            return Ok(());
        }
        self.uncommitted_events
            .push(NoteEventKind::NoteTitleChanged(NoteTitleChanged {
                title: new_title.to_owned(),
            }));
        Ok(())
    }

    /// Decides a content change.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] on bad input or owner mismatch
    /// and [`DomainError::AlreadyDeleted`] when the note is deleted.
    pub fn change_content(&mut self, owner_id: Uuid, new_content: &str) -> Result<(), DomainError> {
        self.ensure_writable(owner_id)?;
        validate_content(new_content)?;
        if self.content == new_content {
            return Ok(());
        }
        self.uncommitted_events
            .push(NoteEventKind::NoteContentChanged(NoteContentChanged {
                content: new_content.to_owned(),
            }));
        Ok(())
    }

    /// Decides a tag-set replacement.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] on bad input or owner mismatch
    /// and [`DomainError::AlreadyDeleted`] when the note is deleted.
    pub fn change_tags(
        &mut self,
        owner_id: Uuid,
        new_tags: BTreeSet<String>,
    ) -> Result<(), DomainError> {
        self.ensure_writable(owner_id)?;
        validate_tags(&new_tags)?;
        if self.tags == new_tags {
            return Ok(());
        }
        self.uncommitted_events
            .push(NoteEventKind::NoteTagsChanged(NoteTagsChanged {
                tags: new_tags,
            }));
        Ok(())
    }

    /// Decides a logical deletion.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] on owner mismatch and
    /// [`DomainError::AlreadyDeleted`] when the note is already deleted.
    pub fn delete(&mut self, owner_id: Uuid) -> Result<(), DomainError> {
        self.ensure_writable(owner_id)?;
        self.uncommitted_events
            .push(NoteEventKind::NoteDeleted(NoteDeleted));
        Ok(())
    }

    fn ensure_created(&self) -> Result<(), DomainError> {
        if self.owner_id.is_none() {
            return Err(DomainError::CorruptEventStream {
                aggregate_id: self.id,
                detail: "event applied before creation".into(),
            });
        }
        Ok(())
    }

    fn ensure_writable(&self, owner_id: Uuid) -> Result<(), DomainError> {
        match self.owner_id {
            None => Err(DomainError::NotFound(self.id)),
            Some(owner) if owner != owner_id => {
                Err(DomainError::Validation("note belongs to another owner".into()))
            }
            Some(_) if self.deleted => Err(DomainError::AlreadyDeleted(self.id)),
            Some(_) => Ok(()),
        }
    }
}

impl AggregateRoot for NoteAggregate {
    type Event = NoteEventKind;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) -> Result<(), DomainError> {
        match event {
            NoteEventKind::NoteCreated(created) => {
                if self.owner_id.is_some() {
                    return Err(DomainError::CorruptEventStream {
                        aggregate_id: self.id,
                        detail: "creation event applied twice".into(),
                    });
                }
                self.owner_id = Some(created.owner_id);
                self.title.clone_from(&created.title);
                self.content.clone_from(&created.content);
                self.tags = created.tags.clone();
            }
            NoteEventKind::NoteTitleChanged(changed) => {
                self.ensure_created()?;
                self.title.clone_from(&changed.title);
            }
            NoteEventKind::NoteContentChanged(changed) => {
                self.ensure_created()?;
                self.content.clone_from(&changed.content);
            }
            NoteEventKind::NoteTagsChanged(changed) => {
                self.ensure_created()?;
                self.tags = changed.tags.clone();
            }
            NoteEventKind::NoteDeleted(NoteDeleted) => {
                self.ensure_created()?;
                self.deleted = true;
            }
        }
        self.version += 1;
        Ok(())
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("title must not be empty".into()));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "title exceeds {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), DomainError> {
    if content.chars().count() > CONTENT_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "content exceeds {CONTENT_MAX_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_tags(tags: &BTreeSet<String>) -> Result<(), DomainError> {
    if tags.len() > MAX_TAGS {
        return Err(DomainError::Validation(format!(
            "at most {MAX_TAGS} tags are allowed"
        )));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(DomainError::Validation("tags must not be empty".into()));
        }
        if tag.chars().count() > TAG_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "tag '{tag}' exceeds {TAG_MAX_LEN} characters"
            )));
        }
    }
    Ok(())
}
