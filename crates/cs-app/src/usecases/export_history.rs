use std::sync::Arc;

use tracing::{info, info_span, warn};

use cs_core::content::{ContentHistory, ContentKind};
use cs_core::crypto::CredentialGuard;
use cs_core::ports::{DatasetPort, DatasetSession, FieldCipherPort, StoreError, StoredRow, UiPort};
use cs_core::security::SecretString;

use super::percent;
use crate::error::PipelineError;

/// What to do when rows of the previous credential cannot be deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteFailurePolicy {
    /// Keep going and write the new credential and rows anyway.
    Continue,
    #[default]
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub on_delete_failure: DeleteFailurePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReport {
    pub texts: usize,
    pub images: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The history was empty; the dataset was not touched.
    NothingToExport,
    Exported(ExportReport),
}

/// Replaces the saved dataset with the given history under a new password.
///
/// Runs synchronously; callers on an async runtime go through
/// [`crate::App::export`], which moves the run onto a blocking thread.
pub struct ExportHistory {
    dataset: Arc<dyn DatasetPort>,
    cipher: Arc<dyn FieldCipherPort>,
    guard: CredentialGuard,
    ui: Arc<dyn UiPort>,
}

impl ExportHistory {
    pub fn new(
        dataset: Arc<dyn DatasetPort>,
        cipher: Arc<dyn FieldCipherPort>,
        guard: CredentialGuard,
        ui: Arc<dyn UiPort>,
    ) -> Self {
        Self {
            dataset,
            cipher,
            guard,
            ui,
        }
    }

    /// The password is consumed and wiped when the run ends, whatever the
    /// outcome. Rows written before a failure stay in the dataset.
    pub fn execute(
        &self,
        history: &ContentHistory,
        password: SecretString,
        options: ExportOptions,
    ) -> Result<ExportOutcome, PipelineError> {
        let _span = info_span!(
            "usecase.export_history.execute",
            texts = history.count(ContentKind::Text),
            images = history.count(ContentKind::Image),
        )
        .entered();

        if history.is_empty() {
            info!("nothing to export");
            self.ui.set_status("No entries to save.");
            return Ok(ExportOutcome::NothingToExport);
        }

        let result = self.run(history, &password, options);
        self.cipher.clear();
        drop(password);
        self.ui.set_progress(0);
        self.ui.set_progress_visible(false);

        match &result {
            Ok(report) => {
                info!(texts = report.texts, images = report.images, "export completed");
                self.ui.set_status("Export completed");
            }
            Err(err) => {
                warn!(error = %err, "export failed");
                self.ui.set_status(&format!("Export failed: {err}"));
            }
        }
        result.map(ExportOutcome::Exported)
    }

    fn run(
        &self,
        history: &ContentHistory,
        password: &SecretString,
        options: ExportOptions,
    ) -> Result<ExportReport, PipelineError> {
        if !self.dataset.exists() {
            self.dataset
                .create_new()
                .map_err(|e| PipelineError::StoreUnavailable(e.to_string()))?;
        }
        let mut session = self
            .dataset
            .connect()
            .map_err(|e| PipelineError::StoreUnavailable(e.to_string()))?;

        if session
            .has_current_credential()
            .map_err(PipelineError::Store)?
        {
            if let Err(err) = delete_previous(session.as_mut()) {
                match options.on_delete_failure {
                    DeleteFailurePolicy::Abort => {
                        return Err(PipelineError::DeletionAborted(err.to_string()));
                    }
                    DeleteFailurePolicy::Continue => {
                        warn!(error = %err, "deleting previous data failed, continuing");
                    }
                }
            }
        }

        let hash = self.guard.hash_password(password.expose())?;
        session
            .create_credential(&hash)
            .map_err(|e| PipelineError::WriteFailure(e.to_string()))?;

        let mut report = ExportReport {
            texts: 0,
            images: 0,
        };
        for kind in ContentKind::ALL {
            let written = self.write_kind(session.as_mut(), history, kind, password)?;
            match kind {
                ContentKind::Text => report.texts = written,
                ContentKind::Image => report.images = written,
            }
        }
        Ok(report)
    }

    fn write_kind(
        &self,
        session: &mut dyn DatasetSession,
        history: &ContentHistory,
        kind: ContentKind,
        password: &SecretString,
    ) -> Result<usize, PipelineError> {
        let entries = history.all(kind);
        if entries.is_empty() {
            return Ok(0);
        }

        self.ui.set_status(&format!("Saving {kind} entries"));
        self.ui.set_progress(0);
        self.ui.set_progress_visible(true);

        let total = entries.len();
        for (done, entry) in entries.iter().enumerate() {
            let encrypt = |plain: &str| {
                self.cipher
                    .encrypt(plain, password)
                    .map_err(|e| PipelineError::WriteFailure(e.to_string()))
            };
            let row = StoredRow {
                index: entry.index.to_string(),
                content: encrypt(&entry.payload.to_persisted_text())?,
                timestamp: encrypt(&entry.timestamp_ms.to_string())?,
            };
            session
                .set(kind, &row)
                .map_err(|e| PipelineError::WriteFailure(e.to_string()))?;
            self.ui.set_progress(percent(done + 1, total));
        }
        Ok(total)
    }
}

/// Removes the current credential and every row it owns.
fn delete_previous(session: &mut dyn DatasetSession) -> Result<(), StoreError> {
    for kind in ContentKind::ALL {
        session.delete_all_for_current_credential(kind)?;
    }
    session.delete_credential()
}
