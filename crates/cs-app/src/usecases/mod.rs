mod capture_clipboard;
mod export_history;
mod extract_urls;
mod import_history;

pub use capture_clipboard::CaptureClipboard;
pub use export_history::{
    DeleteFailurePolicy, ExportHistory, ExportOptions, ExportOutcome, ExportReport,
};
pub use extract_urls::ExtractUrls;
pub use import_history::{ImportHistory, ImportReport};

/// Integer percentage of `done` out of `total`, clamped to 100.
pub(crate) fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.saturating_mul(100) / total).min(100) as u8
}

#[cfg(test)]
pub(crate) mod test_support;
