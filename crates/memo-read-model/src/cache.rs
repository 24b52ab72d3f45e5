//! View cache abstraction and in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use memo_core::error::DomainError;
use uuid::Uuid;

use crate::view::NoteView;

/// Key-value store of note views, written by the projector and read by
/// the query handlers. `put` is idempotent and version-guarded: a
/// lower-version write never overwrites a higher-version entry, so
/// concurrent writers can only move a view forward.
#[async_trait]
pub trait ViewCache: Send + Sync {
    /// Returns the cached view for a note, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] on backend failure.
    async fn get(&self, note_id: Uuid) -> Result<Option<NoteView>, DomainError>;

    /// Stores a view unless a higher-version entry is already cached.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] on backend failure.
    async fn put(&self, view: NoteView) -> Result<(), DomainError>;

    /// Removes the cached view for a note.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] on backend failure.
    async fn invalidate(&self, note_id: Uuid) -> Result<(), DomainError>;

    /// Returns all cached views belonging to an owner, tombstones
    /// included (filtering is the query handler's job).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] on backend failure.
    async fn scan_owner(&self, owner_id: Uuid) -> Result<Vec<NoteView>, DomainError>;
}

/// In-memory view cache.
#[derive(Debug, Default)]
pub struct InMemoryViewCache {
    entries: RwLock<HashMap<Uuid, NoteView>>,
}

impl InMemoryViewCache {
    /// Creates a new, empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ViewCache for InMemoryViewCache {
    async fn get(&self, note_id: Uuid) -> Result<Option<NoteView>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| DomainError::Storage("view cache lock poisoned".into()))?;
        Ok(entries.get(&note_id).cloned())
    }

    async fn put(&self, view: NoteView) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| DomainError::Storage("view cache lock poisoned".into()))?;
        let stale = entries
            .get(&view.id)
            .is_some_and(|existing| existing.version > view.version);
        if !stale {
            entries.insert(view.id, view);
        }
        Ok(())
    }

    async fn invalidate(&self, note_id: Uuid) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| DomainError::Storage("view cache lock poisoned".into()))?;
        entries.remove(&note_id);
        Ok(())
    }

    async fn scan_owner(&self, owner_id: Uuid) -> Result<Vec<NoteView>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| DomainError::Storage("view cache lock poisoned".into()))?;
        Ok(entries
            .values()
            .filter(|view| view.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn view(note_id: Uuid, owner_id: Uuid, title: &str, version: i64) -> NoteView {
        NoteView {
            id: note_id,
            owner_id,
            title: title.to_owned(),
            content: String::new(),
            tags: BTreeSet::new(),
            updated_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            version,
            deleted: false,
        }
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let cache = InMemoryViewCache::new();
        let note_id = Uuid::new_v4();
        let stored = view(note_id, Uuid::new_v4(), "Shopping", 1);

        cache.put(stored.clone()).await.unwrap();

        assert_eq!(cache.get(note_id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_lower_version_put_never_overwrites_higher_version_entry() {
        let cache = InMemoryViewCache::new();
        let note_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        cache
            .put(view(note_id, owner_id, "Groceries", 2))
            .await
            .unwrap();

        cache
            .put(view(note_id, owner_id, "Shopping", 1))
            .await
            .unwrap();

        let cached = cache.get(note_id).await.unwrap().unwrap();
        assert_eq!(cached.title, "Groceries");
        assert_eq!(cached.version, 2);
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = InMemoryViewCache::new();
        let note_id = Uuid::new_v4();
        cache
            .put(view(note_id, Uuid::new_v4(), "Shopping", 1))
            .await
            .unwrap();

        cache.invalidate(note_id).await.unwrap();

        assert_eq!(cache.get(note_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_scan_owner_returns_only_that_owners_views() {
        let cache = InMemoryViewCache::new();
        let owner_id = Uuid::new_v4();
        cache
            .put(view(Uuid::new_v4(), owner_id, "Mine", 1))
            .await
            .unwrap();
        cache
            .put(view(Uuid::new_v4(), Uuid::new_v4(), "Theirs", 1))
            .await
            .unwrap();

        let views = cache.scan_owner(owner_id).await.unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].title, "Mine");
    }
}
