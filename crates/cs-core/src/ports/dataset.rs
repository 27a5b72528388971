//! Encrypted dataset store
//!
//! A dataset is one local store holding the current credential and, per
//! content kind, rows of `(index, content, timestamp)` strings. The pipeline
//! never sees SQL; it goes through these two traits.

use thiserror::Error;

use crate::content::ContentKind;
use crate::crypto::PasswordHash;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("dataset unavailable: {0}")]
    Unavailable(String),

    #[error("dataset query failed: {0}")]
    Query(String),

    #[error("corrupt dataset row: {0}")]
    CorruptRow(String),
}

/// One persisted row. All three fields hold ciphertext when written by the
/// export pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub index: String,
    pub content: String,
    pub timestamp: String,
}

pub trait DatasetPort: Send + Sync {
    fn exists(&self) -> bool;

    /// Creates an empty dataset with the full schema.
    fn create_new(&self) -> Result<(), StoreError>;

    fn connect(&self) -> Result<Box<dyn DatasetSession>, StoreError>;
}

/// An open connection to a dataset. Closed when dropped.
pub trait DatasetSession: Send {
    /// Rows of `kind` that belong to the current credential, ordered by
    /// numeric index.
    fn get_all(&mut self, kind: ContentKind) -> Result<Vec<StoredRow>, StoreError>;

    /// Writes a row owned by the current credential.
    fn set(&mut self, kind: ContentKind, row: &StoredRow) -> Result<(), StoreError>;

    /// Returns the number of rows removed.
    fn delete_all_for_current_credential(&mut self, kind: ContentKind)
        -> Result<usize, StoreError>;

    fn current_credential_id(&mut self) -> Result<Option<i64>, StoreError>;

    fn has_current_credential(&mut self) -> Result<bool, StoreError> {
        Ok(self.current_credential_id()?.is_some())
    }

    fn current_password_hash(&mut self) -> Result<Option<PasswordHash>, StoreError>;

    /// Stores `hash` as the new current credential and returns its id.
    fn create_credential(&mut self, hash: &PasswordHash) -> Result<i64, StoreError>;

    /// Removes the current credential, if any.
    fn delete_credential(&mut self) -> Result<(), StoreError>;
}
