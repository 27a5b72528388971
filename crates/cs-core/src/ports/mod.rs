//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and the infrastructure or
//! platform implementations. Adapters live in `cs-infra` and `cs-platform`.

mod clipboard;
mod clock;
pub mod dataset;
pub mod field_cipher;
mod hotkey;
mod settings;
mod ui;

pub use clipboard::{ClipboardChangeHandler, SystemClipboardPort};
pub use clock::ClockPort;
pub use dataset::{DatasetPort, DatasetSession, StoreError, StoredRow};
pub use field_cipher::{FieldCipherError, FieldCipherPort};
pub use hotkey::{HotkeyRegistrarPort, PasteInjectorPort};
pub use settings::SettingsPort;
pub use ui::UiPort;
