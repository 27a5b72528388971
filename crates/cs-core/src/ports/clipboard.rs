//! Clipboard ports
//!
//! `SystemClipboardPort` is the raw OS clipboard. It is only ever driven
//! through [`crate::clipboard::ClipboardGate`], which serializes access between
//! the watcher and hotkey replay.

use anyhow::Result;

use crate::content::{ContentPayload, ImagePayload};

pub trait SystemClipboardPort: Send + Sync {
    fn contains_text(&self) -> Result<bool>;
    fn contains_image(&self) -> Result<bool>;
    fn read_text(&self) -> Result<String>;
    /// PNG-encoded image currently on the clipboard.
    fn read_image(&self) -> Result<ImagePayload>;
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Callback for capture events emitted by the clipboard watcher.
///
/// The platform layer depends on this abstraction; the app layer implements
/// it.
#[async_trait::async_trait]
pub trait ClipboardChangeHandler: Send + Sync {
    async fn on_clipboard_changed(&self, payload: ContentPayload) -> Result<()>;
}
