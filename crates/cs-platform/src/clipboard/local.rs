use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{anyhow, Result};
use clipboard_rs::{common::RustImage, Clipboard, ClipboardContext, ContentFormat};

use cs_core::content::ImagePayload;
use cs_core::ports::SystemClipboardPort;

fn map_clipboard_err<T>(
    result: std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>,
) -> Result<T> {
    result.map_err(|e| anyhow!(e))
}

/// The OS clipboard through clipboard-rs.
pub struct LocalClipboard {
    inner: Mutex<ClipboardContext>,
}

impl LocalClipboard {
    pub fn new() -> Result<Self> {
        let context = map_clipboard_err(ClipboardContext::new())
            .map_err(|e| e.context("ClipboardContext::new failed"))?;
        Ok(Self {
            inner: Mutex::new(context),
        })
    }

    fn ctx(&self) -> MutexGuard<'_, ClipboardContext> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SystemClipboardPort for LocalClipboard {
    fn contains_text(&self) -> Result<bool> {
        Ok(self.ctx().has(ContentFormat::Text))
    }

    fn contains_image(&self) -> Result<bool> {
        Ok(self.ctx().has(ContentFormat::Image))
    }

    fn read_text(&self) -> Result<String> {
        map_clipboard_err(self.ctx().get_text())
    }

    fn read_image(&self) -> Result<ImagePayload> {
        let image = map_clipboard_err(self.ctx().get_image())?;
        let png = map_clipboard_err(image.to_png())?;
        Ok(ImagePayload::from_png(png.get_bytes().to_vec()))
    }

    fn write_text(&self, text: &str) -> Result<()> {
        map_clipboard_err(self.ctx().set_text(text.to_string()))
    }
}
