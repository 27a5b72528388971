use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use cs_core::content::{ContentEntry, ContentPayload};
use cs_core::ports::UiPort;

const PREVIEW_CHARS: usize = 60;
const PROGRESS_STEP: u8 = 25;

/// Line-oriented presentation on stdout.
#[derive(Debug, Default)]
pub struct ConsoleUi {
    progress_visible: AtomicBool,
    last_progress: AtomicU8,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self::default()
    }

    fn print(&self, line: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{line}");
    }
}

/// One history row: kind, index and a single-line preview.
pub fn render_entry(entry: &ContentEntry) -> String {
    let preview = match &entry.payload {
        ContentPayload::Text(text) => preview_text(text),
        ContentPayload::Image(image) => format!("<image, {} bytes>", image.len()),
    };
    format!("[{} #{}] {}", entry.kind(), entry.index, preview)
}

fn preview_text(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let mut chars = flat.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

impl UiPort for ConsoleUi {
    fn add_entry(&self, entry: &ContentEntry) {
        self.print(&render_entry(entry));
    }

    fn clear_all(&self) {
        self.print("-- history cleared --");
    }

    fn set_status(&self, text: &str) {
        self.print(&format!("status: {text}"));
    }

    fn set_progress(&self, percent: u8) {
        let previous = self.last_progress.swap(percent, Ordering::AcqRel);
        if !self.progress_visible.load(Ordering::Acquire) {
            return;
        }
        if percent == 100 || percent / PROGRESS_STEP > previous / PROGRESS_STEP {
            self.print(&format!("progress: {percent}%"));
        }
    }

    fn set_progress_visible(&self, visible: bool) {
        self.progress_visible.store(visible, Ordering::Release);
        if visible {
            self.last_progress.store(0, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::content::{EntryIndex, ImagePayload};

    fn entry(index: u32, payload: ContentPayload) -> ContentEntry {
        ContentEntry::new(EntryIndex::new(index).unwrap(), 0, payload)
    }

    #[test]
    fn text_rows_are_flattened_and_truncated() {
        let long = format!("line one\nline two {}", "x".repeat(80));
        let row = render_entry(&entry(3, ContentPayload::Text(long)));

        assert!(row.starts_with("[text #3] line one line two"));
        assert!(row.ends_with("..."));
        assert!(!row.contains('\n'));
    }

    #[test]
    fn image_rows_show_size() {
        let row = render_entry(&entry(
            1,
            ContentPayload::Image(ImagePayload::from_png(vec![0; 42])),
        ));
        assert_eq!(row, "[image #1] <image, 42 bytes>");
    }
}
