use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::content::{ContentPayload, ImagePayload};
use crate::ports::SystemClipboardPort;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("clipboard access failed: {0:#}")]
    Clipboard(anyhow::Error),

    #[error("paste injection failed: {0:#}")]
    Paste(anyhow::Error),
}

#[derive(Debug, Default)]
struct GateState {
    /// Last text this process put on the clipboard.
    last_written_text: Option<String>,
    /// Fingerprint of the last payload reported by `observe`.
    last_seen: Option<[u8; 32]>,
}

/// Single point of access to the OS clipboard.
///
/// The watcher and hotkey replay both go through one mutex, so a poll never
/// runs in the middle of a save/write/paste/restore sequence.
pub struct ClipboardGate {
    clipboard: Arc<dyn SystemClipboardPort>,
    state: Mutex<GateState>,
}

impl ClipboardGate {
    pub fn new(clipboard: Arc<dyn SystemClipboardPort>) -> Self {
        Self {
            clipboard,
            state: Mutex::new(GateState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads and classifies the clipboard.
    ///
    /// Returns `Some` only when the content differs from what the previous
    /// call reported. Text takes precedence over images; text this process
    /// wrote itself is skipped and the image check runs instead.
    pub fn observe(&self) -> anyhow::Result<Option<ContentPayload>> {
        let mut state = self.lock();

        let mut payload = None;
        if self.clipboard.contains_text()? {
            let text = self.clipboard.read_text()?;
            if state.last_written_text.as_deref() != Some(text.as_str()) {
                // The clipboard has moved on from our own write.
                state.last_written_text = None;
                payload = Some(ContentPayload::Text(text));
            }
        }
        if payload.is_none() && self.clipboard.contains_image()? {
            let image: ImagePayload = self.clipboard.read_image()?;
            payload = Some(ContentPayload::Image(image));
        }

        let Some(payload) = payload else {
            return Ok(None);
        };

        let fingerprint = payload.fingerprint();
        if state.last_seen == Some(fingerprint) {
            return Ok(None);
        }
        state.last_seen = Some(fingerprint);

        #[cfg(feature = "tracing")]
        tracing::debug!(kind = %payload.kind(), "clipboard content changed");

        Ok(Some(payload))
    }

    /// Puts `text` on the clipboard, runs `paste`, then puts back whatever
    /// text was there before.
    ///
    /// The restore step also runs when `paste` fails. The text left on the
    /// clipboard afterwards is remembered as self-written.
    pub fn replay_text<F>(&self, text: &str, paste: F) -> Result<(), ReplayError>
    where
        F: FnOnce() -> anyhow::Result<()>,
    {
        let mut state = self.lock();

        let saved = if self
            .clipboard
            .contains_text()
            .map_err(ReplayError::Clipboard)?
        {
            Some(self.clipboard.read_text().map_err(ReplayError::Clipboard)?)
        } else {
            None
        };

        self.clipboard
            .write_text(text)
            .map_err(ReplayError::Clipboard)?;
        state.last_written_text = Some(text.to_string());

        let pasted = paste().map_err(ReplayError::Paste);

        if let Some(saved) = saved {
            self.clipboard
                .write_text(&saved)
                .map_err(ReplayError::Clipboard)?;
            state.last_written_text = Some(saved);
        }

        pasted
    }
}
