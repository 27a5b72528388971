//! # cs-core
//!
//! Core domain models and business logic for clipstash.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod clipboard;
pub mod config;
pub mod content;
pub mod crypto;
pub mod hotkey;
pub mod ports;
pub mod security;
pub mod settings;
pub mod urls;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use content::{
    ContentEntry, ContentHistory, ContentKind, ContentPayload, ContentRegistry, EntryIndex,
    HistoryError, ImagePayload,
};
pub use hotkey::{Digit, HotkeyBinding, ModifierSet, ShortcutConfig};
pub use security::SecretString;
pub use settings::Settings;
