//! Clipboard watcher runtime
//!
//! ```text
//! OS clipboard
//!      ↓
//! ClipboardGate        (cs-core, shared with hotkey replay)
//!      ↓
//! ClipboardWatcher     (poll, classify, dedupe)
//!      ↓  bounded mpsc
//! PollingClipboardRuntime forwarder
//!      ↓
//! ClipboardChangeHandler (capture use case)
//! ```

mod runtime;
mod watcher;

pub use runtime::PollingClipboardRuntime;
pub use watcher::ClipboardWatcher;
