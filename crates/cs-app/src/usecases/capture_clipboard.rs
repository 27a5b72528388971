use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use cs_core::content::{ContentEntry, ContentPayload, ContentRegistry};
use cs_core::ports::{ClipboardChangeHandler, ClockPort, UiPort};

/// Turns a capture event from the watcher into a history entry.
pub struct CaptureClipboard {
    registry: ContentRegistry,
    clock: Arc<dyn ClockPort>,
    ui: Arc<dyn UiPort>,
}

impl CaptureClipboard {
    pub fn new(registry: ContentRegistry, clock: Arc<dyn ClockPort>, ui: Arc<dyn UiPort>) -> Self {
        Self {
            registry,
            clock,
            ui,
        }
    }

    pub fn execute(&self, payload: ContentPayload) -> ContentEntry {
        let entry = self.registry.append(payload, self.clock.now_ms());
        info!(kind = %entry.kind(), index = %entry.index, "captured clipboard entry");
        self.ui.add_entry(&entry);
        entry
    }
}

#[async_trait]
impl ClipboardChangeHandler for CaptureClipboard {
    async fn on_clipboard_changed(&self, payload: ContentPayload) -> Result<()> {
        self.execute(payload);
        Ok(())
    }
}
