use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ContentEntry, ContentHistory, ContentKind, ContentPayload, EntryIndex, HistoryError};

/// Shared handle to the session's clipboard history.
///
/// All access goes through one lock around the whole history: appends from
/// the watcher, the import's replace, and reads from the hotkey dispatcher
/// and export are serialized against each other. Readers get owned clones so
/// the lock is never held across slow work.
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    inner: Arc<RwLock<ContentHistory>>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, ContentHistory> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ContentHistory> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, payload: ContentPayload, timestamp_ms: i64) -> ContentEntry {
        self.write().push_captured(payload, timestamp_ms).clone()
    }

    pub fn get(&self, kind: ContentKind, index: u32) -> Result<ContentEntry, HistoryError> {
        self.read().get(kind, index).cloned()
    }

    pub fn all(&self, kind: ContentKind) -> Vec<ContentEntry> {
        self.read().all(kind).to_vec()
    }

    pub fn count(&self, kind: ContentKind) -> usize {
        self.read().count(kind)
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear_all(&self) {
        self.write().clear_all();
    }

    pub fn recent_text(&self, slot: usize) -> Option<String> {
        self.read().recent_text(slot).map(str::to_owned)
    }

    /// Consistent copy of both sequences.
    pub fn snapshot(&self) -> ContentHistory {
        self.read().clone()
    }

    /// Swaps in a whole new history in one step.
    pub fn replace(&self, history: ContentHistory) {
        *self.write() = history;
    }

    pub fn last_index(&self, kind: ContentKind) -> Option<EntryIndex> {
        self.read().all(kind).last().map(|entry| entry.index)
    }
}
