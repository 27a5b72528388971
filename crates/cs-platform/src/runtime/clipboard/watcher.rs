use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use cs_core::clipboard::ClipboardGate;
use cs_core::content::ContentPayload;

/// Polls the clipboard through the gate and emits one event per change.
///
/// The watcher never assigns indices or persists anything. Change detection
/// and self-write suppression live in [`ClipboardGate::observe`].
pub struct ClipboardWatcher {
    gate: Arc<ClipboardGate>,
    tx: mpsc::Sender<ContentPayload>,
}

impl ClipboardWatcher {
    pub fn new(gate: Arc<ClipboardGate>, tx: mpsc::Sender<ContentPayload>) -> Self {
        Self { gate, tx }
    }

    /// Checks the clipboard once.
    ///
    /// A full channel drops the event with a warning; the watcher never waits
    /// on its consumer. A closed channel is an error.
    pub async fn check_once(&self) -> Result<()> {
        let gate = self.gate.clone();
        let observed = tokio::task::spawn_blocking(move || gate.observe()).await??;

        let Some(payload) = observed else {
            return Ok(());
        };

        let kind = payload.kind();
        match self.tx.try_send(payload) {
            Ok(()) => {
                debug!(%kind, "capture event emitted");
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                warn!(%kind, "capture channel full, dropping event");
                Ok(())
            }
            Err(TrySendError::Closed(_)) => anyhow::bail!("capture channel closed"),
        }
    }
}
