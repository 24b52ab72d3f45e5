//! Read-model projector: folds published events into cached note views.

use std::sync::Arc;

use async_trait::async_trait;
use memo_core::bus::EventSubscriber;
use memo_core::error::DomainError;
use memo_core::store::{EventStore, StoredEvent};
use uuid::Uuid;

use crate::cache::ViewCache;
use crate::view::NoteView;

/// Projects note events into the view cache.
///
/// Projection is idempotent: an event whose sequence number is at or
/// below the cached view's version is a duplicate delivery and is
/// ignored, so at-least-once delivery from the bus is safe. A detected
/// gap falls back to [`rebuild`], which re-derives the view from the
/// event store.
///
/// [`rebuild`]: NoteProjector::rebuild
pub struct NoteProjector {
    store: Arc<dyn EventStore>,
    cache: Arc<dyn ViewCache>,
}

impl NoteProjector {
    /// Creates a projector over the given store and cache.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>, cache: Arc<dyn ViewCache>) -> Self {
        Self { store, cache }
    }

    /// Replays the full event stream for one note and overwrites its
    /// cache entry. Used after a detected gap, on cold start, and as the
    /// query handlers' cache-miss fallback.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotFound`] for an unknown note and
    /// propagates store, fold, and cache failures.
    pub async fn rebuild(&self, note_id: Uuid) -> Result<NoteView, DomainError> {
        let events = self.store.load(note_id).await?;
        let mut view: Option<NoteView> = None;
        for event in &events {
            view = Some(NoteView::apply_stored(view, event)?);
        }
        let view = view.ok_or(DomainError::NotFound(note_id))?;
        self.cache.put(view.clone()).await?;
        tracing::debug!(%note_id, version = view.version, "view rebuilt from event store");
        Ok(view)
    }

    /// Reads the stream tail past the view's version and folds it in.
    async fn catch_up(&self, mut view: NoteView) -> Result<(), DomainError> {
        let tail = self.store.load_from(view.id, view.version).await?;
        for event in &tail {
            view = NoteView::apply_stored(Some(view), event)?;
        }
        self.cache.put(view).await
    }

    async fn project(&self, event: &StoredEvent) -> Result<(), DomainError> {
        let note_id = event.aggregate_id;
        let current = self.cache.get(note_id).await?;

        match current {
            Some(view) if event.sequence_number <= view.version => {
                // Duplicate delivery; the fold already covered this event.
                tracing::debug!(
                    %note_id,
                    sequence_number = event.sequence_number,
                    cached_version = view.version,
                    "ignoring duplicate event delivery"
                );
                Ok(())
            }
            Some(view) if event.sequence_number == view.version + 1 => {
                let next = NoteView::apply_stored(Some(view), event)?;
                self.cache.put(next).await
            }
            Some(view) => {
                tracing::warn!(
                    %note_id,
                    sequence_number = event.sequence_number,
                    cached_version = view.version,
                    "gap in delivered events, catching up from the store"
                );
                self.catch_up(view).await
            }
            None if event.sequence_number == 1 => {
                let next = NoteView::apply_stored(None, event)?;
                self.cache.put(next).await
            }
            None => {
                tracing::warn!(
                    %note_id,
                    sequence_number = event.sequence_number,
                    "event for an uncached view arrived mid-stream, rebuilding"
                );
                self.rebuild(note_id).await.map(|_| ())
            }
        }
    }
}

#[async_trait]
impl EventSubscriber for NoteProjector {
    async fn on_event(&self, event: &StoredEvent) -> Result<(), DomainError> {
        self.project(event).await
    }
}
