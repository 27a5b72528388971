use crate::content::ContentEntry;

/// Presentation surface: history rows, a status line and a progress bar.
///
/// Calls may come from the pipeline worker thread, so implementations must be
/// thread-safe. Rendering failures are the adapter's concern.
pub trait UiPort: Send + Sync {
    fn add_entry(&self, entry: &ContentEntry);
    fn clear_all(&self);
    fn set_status(&self, text: &str);
    /// `percent` is in `0..=100`.
    fn set_progress(&self, percent: u8);
    fn set_progress_visible(&self, visible: bool);
}
