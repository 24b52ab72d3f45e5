//! Command handlers for the Note context.
//!
//! Each handler runs the write-path state machine: validate, load and
//! replay the aggregate, decide, then append with an optimistic
//! concurrency check. A conflicting append is retried against freshly
//! loaded state up to a bounded count; successfully appended events are
//! handed to the event bus.

use std::collections::BTreeSet;
use std::time::Instant;

use memo_core::aggregate::AggregateRoot;
use memo_core::bus::EventPublisher;
use memo_core::error::DomainError;
use memo_core::event::DomainEvent;
use memo_core::store::{EventStore, NewEvent, StoredEvent};
use uuid::Uuid;

use crate::domain::aggregates::NoteAggregate;
use crate::domain::commands::{
    ChangeNoteContent, ChangeNoteTags, ChangeNoteTitle, CreateNote, DeleteNote,
};
use crate::domain::events::NoteEventKind;

/// How often a conflicting append is retried before giving up.
pub const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

/// Per-invocation handler knobs supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct HandlerOptions {
    /// Retries after the first conflicting append before surfacing
    /// `TooManyConflicts`.
    pub max_conflict_retries: u32,
    /// Absolute deadline for the whole invocation, retries included.
    /// Checked before every attempt; nothing is appended past it.
    pub deadline: Option<Instant>,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
            deadline: None,
        }
    }
}

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct NoteCommandResult {
    /// The note affected or created by the command.
    pub note_id: Uuid,
    /// The durable version after the command.
    pub version: i64,
    /// The stored events produced and persisted (empty for a no-op).
    pub stored_events: Vec<StoredEvent>,
}

fn to_new_event(kind: &NoteEventKind, correlation_id: Uuid) -> NewEvent {
    NewEvent {
        event_id: Uuid::new_v4(),
        event_type: kind.event_type().to_owned(),
        payload: kind.to_payload(),
        correlation_id,
        causation_id: correlation_id,
    }
}

fn check_deadline(options: &HandlerOptions, aggregate_id: Uuid) -> Result<(), DomainError> {
    if let Some(deadline) = options.deadline {
        if Instant::now() >= deadline {
            return Err(DomainError::DeadlineExceeded { aggregate_id });
        }
    }
    Ok(())
}

/// The append is already durable; a publish failure only delays read
/// models until the next rebuild.
async fn publish_best_effort(publisher: &dyn EventPublisher, events: &[StoredEvent]) {
    if let Err(err) = publisher.publish(events).await {
        tracing::warn!(error = %err, "failed to publish appended events to the bus");
    }
}

/// Handles the `CreateNote` command: creates a fresh aggregate, decides
/// the creation, and persists the resulting event at version 1. The
/// aggregate id is freshly generated, so there is no stream to conflict
/// with and the retry budget never comes into play; the caller deadline
/// still applies.
///
/// # Errors
///
/// Returns `DomainError::Validation` for bad input,
/// `DomainError::DeadlineExceeded` past the caller deadline, and
/// propagates store failures.
pub async fn handle_create_note(
    command: &CreateNote,
    store: &dyn EventStore,
    publisher: &dyn EventPublisher,
    options: &HandlerOptions,
) -> Result<NoteCommandResult, DomainError> {
    let note_id = Uuid::new_v4();
    check_deadline(options, note_id)?;
    let mut note = NoteAggregate::new(note_id);

    let tags: BTreeSet<String> = command.tags.iter().cloned().collect();
    note.create(command.owner_id, &command.title, &command.content, tags)?;

    let new_events: Vec<NewEvent> = note
        .uncommitted_events()
        .iter()
        .map(|kind| to_new_event(kind, command.correlation_id))
        .collect();

    let stored_events = store.append(note_id, note.version(), &new_events).await?;
    publish_best_effort(publisher, &stored_events).await;

    let version = stored_events.last().map_or(0, |e| e.sequence_number);
    Ok(NoteCommandResult {
        note_id,
        version,
        stored_events,
    })
}

/// Handles the `ChangeNoteTitle` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown note, `Validation` /
/// `AlreadyDeleted` from the decision, `TooManyConflicts` when the retry
/// budget is exhausted, and `DeadlineExceeded` past the caller deadline.
pub async fn handle_change_note_title(
    command: &ChangeNoteTitle,
    store: &dyn EventStore,
    publisher: &dyn EventPublisher,
    options: &HandlerOptions,
) -> Result<NoteCommandResult, DomainError> {
    mutate_note(
        command.note_id,
        command.correlation_id,
        store,
        publisher,
        options,
        |note| note.change_title(command.owner_id, &command.title),
    )
    .await
}

/// Handles the `ChangeNoteContent` command.
///
/// # Errors
///
/// Same failure surface as [`handle_change_note_title`].
pub async fn handle_change_note_content(
    command: &ChangeNoteContent,
    store: &dyn EventStore,
    publisher: &dyn EventPublisher,
    options: &HandlerOptions,
) -> Result<NoteCommandResult, DomainError> {
    mutate_note(
        command.note_id,
        command.correlation_id,
        store,
        publisher,
        options,
        |note| note.change_content(command.owner_id, &command.content),
    )
    .await
}

/// Handles the `ChangeNoteTags` command.
///
/// # Errors
///
/// Same failure surface as [`handle_change_note_title`].
pub async fn handle_change_note_tags(
    command: &ChangeNoteTags,
    store: &dyn EventStore,
    publisher: &dyn EventPublisher,
    options: &HandlerOptions,
) -> Result<NoteCommandResult, DomainError> {
    mutate_note(
        command.note_id,
        command.correlation_id,
        store,
        publisher,
        options,
        |note| {
            let tags: BTreeSet<String> = command.tags.iter().cloned().collect();
            note.change_tags(command.owner_id, tags)
        },
    )
    .await
}

/// Handles the `DeleteNote` command.
///
/// # Errors
///
/// Same failure surface as [`handle_change_note_title`].
pub async fn handle_delete_note(
    command: &DeleteNote,
    store: &dyn EventStore,
    publisher: &dyn EventPublisher,
    options: &HandlerOptions,
) -> Result<NoteCommandResult, DomainError> {
    mutate_note(
        command.note_id,
        command.correlation_id,
        store,
        publisher,
        options,
        |note| note.delete(command.owner_id),
    )
    .await
}

/// Shared load → replay → decide → append loop for mutating commands.
///
/// The decision closure is re-run against freshly loaded state on every
/// conflict retry, so the emitted events always reflect the stream head
/// they are appended onto.
async fn mutate_note<F>(
    note_id: Uuid,
    correlation_id: Uuid,
    store: &dyn EventStore,
    publisher: &dyn EventPublisher,
    options: &HandlerOptions,
    decide: F,
) -> Result<NoteCommandResult, DomainError>
where
    F: Fn(&mut NoteAggregate) -> Result<(), DomainError>,
{
    let mut attempts: u32 = 0;
    loop {
        check_deadline(options, note_id)?;

        let existing_events = store.load(note_id).await?;
        let mut note = NoteAggregate::replay(note_id, &existing_events)?;

        decide(&mut note)?;

        if note.uncommitted_events().is_empty() {
            // Nothing to append; the command was a no-op.
            return Ok(NoteCommandResult {
                note_id,
                version: note.version(),
                stored_events: Vec::new(),
            });
        }

        let new_events: Vec<NewEvent> = note
            .uncommitted_events()
            .iter()
            .map(|kind| to_new_event(kind, correlation_id))
            .collect();

        attempts += 1;
        match store.append(note_id, note.version(), &new_events).await {
            Ok(stored_events) => {
                publish_best_effort(publisher, &stored_events).await;
                let version = stored_events
                    .last()
                    .map_or(note.version(), |e| e.sequence_number);
                return Ok(NoteCommandResult {
                    note_id,
                    version,
                    stored_events,
                });
            }
            Err(DomainError::ConcurrencyConflict { .. })
                if attempts <= options.max_conflict_retries =>
            {
                tracing::debug!(%note_id, attempts, "append conflicted, retrying against fresh state");
            }
            Err(DomainError::ConcurrencyConflict { .. }) => {
                return Err(DomainError::TooManyConflicts {
                    aggregate_id: note_id,
                    attempts,
                });
            }
            Err(other) => return Err(other),
        }
    }
}
