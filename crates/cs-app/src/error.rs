use thiserror::Error;

use cs_core::content::ContentKind;
use cs_core::crypto::CredentialError;
use cs_core::hotkey::ShortcutConfigError;
use cs_core::ports::StoreError;

/// Failure of an export or import run. Every variant ends the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dataset unavailable: {0}")]
    StoreUnavailable(String),

    #[error("no saved dataset to load")]
    NoSuchDataset,

    #[error("dataset has no credential")]
    NoSuchCredential,

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("could not decrypt {kind} entry {index}")]
    DecryptError { kind: ContentKind, index: String },

    #[error("write failed: {0}")]
    WriteFailure(String),

    #[error("could not delete previously saved data: {0}")]
    DeletionAborted(String),

    #[error("corrupt {kind} row: {reason}")]
    CorruptRow { kind: ContentKind, reason: String },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("dataset read failed: {0}")]
    Store(StoreError),

    #[error("background task failed: {0}")]
    Worker(String),
}

#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("could not register hotkey {binding}: {reason}")]
    HotkeyRegistrationFailure { binding: String, reason: String },

    #[error("invalid shortcut configuration: {0}")]
    InvalidConfig(#[from] ShortcutConfigError),

    #[error("clipboard access failed: {0}")]
    Clipboard(String),

    #[error("paste failed: {0}")]
    Paste(String),
}
