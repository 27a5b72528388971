//! In-memory port implementations shared by the use case tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cs_core::content::{ContentEntry, ContentKind};
use cs_core::crypto::{CredentialGuard, KdfParams, PasswordHash};
use cs_core::ports::{
    DatasetPort, DatasetSession, FieldCipherError, FieldCipherPort, StoreError, StoredRow, UiPort,
};
use cs_core::security::SecretString;

pub fn fast_guard() -> CredentialGuard {
    CredentialGuard::with_params(KdfParams::insecure_fast())
}

#[derive(Default)]
struct Store {
    credentials: Vec<(i64, PasswordHash)>,
    rows: HashMap<(i64, ContentKind), Vec<StoredRow>>,
    next_id: i64,
    sets: usize,
}

impl Store {
    fn current(&self) -> Option<i64> {
        self.credentials.last().map(|(id, _)| *id)
    }
}

#[derive(Default)]
struct Faults {
    connect: AtomicBool,
    deletes: AtomicBool,
    /// Number of successful `set` calls before every further one fails.
    sets_after: Mutex<Option<usize>>,
}

/// Dataset kept in memory, with switchable failures.
#[derive(Default)]
pub struct MemoryDataset {
    exists: AtomicBool,
    store: Arc<Mutex<Store>>,
    faults: Arc<Faults>,
}

impl MemoryDataset {
    pub fn fail_connect(&self, on: bool) {
        self.faults.connect.store(on, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, on: bool) {
        self.faults.deletes.store(on, Ordering::SeqCst);
    }

    pub fn fail_sets_after(&self, successes: usize) {
        *self.faults.sets_after.lock().unwrap() = Some(successes);
    }

    /// Rows of the current credential.
    pub fn rows(&self, kind: ContentKind) -> Vec<StoredRow> {
        let store = self.store.lock().unwrap();
        store
            .current()
            .and_then(|id| store.rows.get(&(id, kind)).cloned())
            .unwrap_or_default()
    }

    pub fn credential_count(&self) -> usize {
        self.store.lock().unwrap().credentials.len()
    }

    /// Overwrites one field of a stored row of the current credential.
    pub fn tamper(&self, kind: ContentKind, position: usize, edit: impl FnOnce(&mut StoredRow)) {
        let mut store = self.store.lock().unwrap();
        let id = store.current().unwrap();
        let rows = store.rows.get_mut(&(id, kind)).unwrap();
        edit(&mut rows[position]);
    }
}

impl DatasetPort for MemoryDataset {
    fn exists(&self) -> bool {
        self.exists.load(Ordering::SeqCst)
    }

    fn create_new(&self) -> Result<(), StoreError> {
        self.exists.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn connect(&self) -> Result<Box<dyn DatasetSession>, StoreError> {
        if self.faults.connect.load(Ordering::SeqCst) || !self.exists() {
            return Err(StoreError::Unavailable("memory dataset offline".into()));
        }
        Ok(Box::new(MemorySession {
            store: self.store.clone(),
            faults: self.faults.clone(),
        }))
    }
}

struct MemorySession {
    store: Arc<Mutex<Store>>,
    faults: Arc<Faults>,
}

impl DatasetSession for MemorySession {
    fn get_all(&mut self, kind: ContentKind) -> Result<Vec<StoredRow>, StoreError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .current()
            .and_then(|id| store.rows.get(&(id, kind)).cloned())
            .unwrap_or_default())
    }

    fn set(&mut self, kind: ContentKind, row: &StoredRow) -> Result<(), StoreError> {
        let mut store = self.store.lock().unwrap();
        if let Some(limit) = *self.faults.sets_after.lock().unwrap() {
            if store.sets >= limit {
                return Err(StoreError::Query("disk full".into()));
            }
        }
        let id = store
            .current()
            .ok_or_else(|| StoreError::Query("no credential".into()))?;
        store.sets += 1;
        store.rows.entry((id, kind)).or_default().push(row.clone());
        Ok(())
    }

    fn delete_all_for_current_credential(
        &mut self,
        kind: ContentKind,
    ) -> Result<usize, StoreError> {
        if self.faults.deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Query("database is locked".into()));
        }
        let mut store = self.store.lock().unwrap();
        let Some(id) = store.current() else {
            return Ok(0);
        };
        Ok(store.rows.remove(&(id, kind)).map(|r| r.len()).unwrap_or(0))
    }

    fn current_credential_id(&mut self) -> Result<Option<i64>, StoreError> {
        Ok(self.store.lock().unwrap().current())
    }

    fn current_password_hash(&mut self) -> Result<Option<PasswordHash>, StoreError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .credentials
            .last()
            .map(|(_, hash)| hash.clone()))
    }

    fn create_credential(&mut self, hash: &PasswordHash) -> Result<i64, StoreError> {
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let id = store.next_id;
        store.credentials.push((id, hash.clone()));
        Ok(id)
    }

    fn delete_credential(&mut self) -> Result<(), StoreError> {
        if self.faults.deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Query("database is locked".into()));
        }
        self.store.lock().unwrap().credentials.pop();
        Ok(())
    }
}

/// Reversible stand-in cipher: `password|plaintext`.
#[derive(Default)]
pub struct TaggingCipher {
    clears: AtomicUsize,
}

impl TaggingCipher {
    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl FieldCipherPort for TaggingCipher {
    fn encrypt(&self, plaintext: &str, password: &SecretString) -> Result<String, FieldCipherError> {
        Ok(format!("{}|{}", password.expose(), plaintext))
    }

    fn decrypt(
        &self,
        ciphertext: &str,
        password: &SecretString,
    ) -> Result<String, FieldCipherError> {
        ciphertext
            .strip_prefix(password.expose())
            .and_then(|rest| rest.strip_prefix('|'))
            .map(str::to_string)
            .ok_or(FieldCipherError::DecryptFailed)
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Added(ContentKind, u32),
    Cleared,
    Status(String),
    Progress(u8),
    ProgressVisible(bool),
}

#[derive(Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingUi {
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn last_status(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            UiEvent::Status(s) => Some(s),
            _ => None,
        })
    }

    pub fn progress_values(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Progress(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: UiEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl UiPort for RecordingUi {
    fn add_entry(&self, entry: &ContentEntry) {
        self.push(UiEvent::Added(entry.kind(), entry.index.get()));
    }
    fn clear_all(&self) {
        self.push(UiEvent::Cleared);
    }
    fn set_status(&self, text: &str) {
        self.push(UiEvent::Status(text.to_string()));
    }
    fn set_progress(&self, percent: u8) {
        self.push(UiEvent::Progress(percent));
    }
    fn set_progress_visible(&self, visible: bool) {
        self.push(UiEvent::ProgressVisible(visible));
    }
}
