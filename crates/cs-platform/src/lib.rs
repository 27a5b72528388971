//! Platform adapters for clipstash: the OS clipboard, the polling watcher
//! runtime, global hotkeys, synthetic paste and data directories.

pub mod app_dirs;
pub mod clipboard;
pub mod hotkey;
pub mod input;
pub mod runtime;

pub use app_dirs::DirsAppDirsAdapter;
pub use clipboard::LocalClipboard;
pub use hotkey::GlobalHotkeyRegistrar;
pub use input::EnigoPasteInjector;
pub use runtime::clipboard::{ClipboardWatcher, PollingClipboardRuntime};
