//! Query handlers for notes.
//!
//! Queries are served from the view cache and never touch the event
//! store directly; a cache miss (or a failing cache backend) falls back
//! to a synchronous projector rebuild instead of returning stale or
//! empty data. Tombstoned notes are excluded from every result.

use memo_core::error::DomainError;
use uuid::Uuid;

use crate::cache::ViewCache;
use crate::projector::NoteProjector;
use crate::view::NoteView;

/// Optional list filter.
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    /// Keep only notes carrying this tag.
    pub tag: Option<String>,
}

/// Offset/limit pagination window.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Entries to skip.
    pub offset: usize,
    /// Maximum entries to return.
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// Retrieves one note view.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for unknown, deleted, or
/// foreign-owned notes, and propagates rebuild failures.
pub async fn get_note(
    note_id: Uuid,
    owner_id: Uuid,
    cache: &dyn ViewCache,
    projector: &NoteProjector,
) -> Result<NoteView, DomainError> {
    let view = match cache.get(note_id).await {
        Ok(Some(view)) => view,
        Ok(None) => projector.rebuild(note_id).await?,
        Err(DomainError::Storage(reason)) => {
            tracing::warn!(%note_id, %reason, "view cache unavailable, rebuilding from event store");
            projector.rebuild(note_id).await?
        }
        Err(other) => return Err(other),
    };

    if view.deleted || view.owner_id != owner_id {
        return Err(DomainError::NotFound(note_id));
    }
    Ok(view)
}

/// Lists an owner's notes, newest first.
///
/// # Errors
///
/// Propagates cache backend failures.
pub async fn list_by_owner(
    owner_id: Uuid,
    filter: &NoteFilter,
    pagination: Pagination,
    cache: &dyn ViewCache,
) -> Result<Vec<NoteView>, DomainError> {
    let mut views: Vec<NoteView> = cache
        .scan_owner(owner_id)
        .await?
        .into_iter()
        .filter(|view| !view.deleted)
        .filter(|view| {
            filter
                .tag
                .as_ref()
                .is_none_or(|tag| view.tags.contains(tag))
        })
        .collect();

    sort_newest_first(&mut views);
    Ok(views
        .into_iter()
        .skip(pagination.offset)
        .take(pagination.limit)
        .collect())
}

/// Case-insensitive substring search over an owner's titles and contents,
/// newest first.
///
/// # Errors
///
/// Propagates cache backend failures.
pub async fn search_notes(
    owner_id: Uuid,
    text: &str,
    cache: &dyn ViewCache,
) -> Result<Vec<NoteView>, DomainError> {
    let needle = text.to_lowercase();
    let mut views: Vec<NoteView> = cache
        .scan_owner(owner_id)
        .await?
        .into_iter()
        .filter(|view| !view.deleted)
        .filter(|view| {
            view.title.to_lowercase().contains(&needle)
                || view.content.to_lowercase().contains(&needle)
        })
        .collect();

    sort_newest_first(&mut views);
    Ok(views)
}

// Ties broken by id so pagination windows stay stable.
fn sort_newest_first(views: &mut [NoteView]) {
    views.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
}
