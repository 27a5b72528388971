//! Application layer: use cases over the ports defined in `cs-core`.

pub mod app;
pub mod deps;
pub mod error;
pub mod hotkey;
pub mod usecases;

pub use app::App;
pub use deps::AppDeps;
pub use error::{HotkeyError, PipelineError};
pub use hotkey::HotkeyDispatcher;
pub use usecases::{
    CaptureClipboard, DeleteFailurePolicy, ExportHistory, ExportOptions, ExportOutcome,
    ExportReport, ExtractUrls, ImportHistory, ImportReport,
};
