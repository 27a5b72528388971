use std::sync::Arc;

use tracing::{info, info_span, warn};

use cs_core::content::{
    ContentEntry, ContentHistory, ContentKind, ContentPayload, ContentRegistry, EntryIndex,
};
use cs_core::crypto::CredentialGuard;
use cs_core::ports::{DatasetPort, DatasetSession, FieldCipherPort, StoreError, StoredRow, UiPort};
use cs_core::security::SecretString;

use super::percent;
use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub texts: usize,
    pub images: usize,
}

/// Verifies the password against the saved credential and loads the saved
/// history into the registry.
///
/// Rows are staged first. The registry is replaced in one swap: either by
/// the full staged history, or, when a kind fails half way, by the kinds that
/// completed before it.
pub struct ImportHistory {
    dataset: Arc<dyn DatasetPort>,
    cipher: Arc<dyn FieldCipherPort>,
    guard: CredentialGuard,
    registry: ContentRegistry,
    ui: Arc<dyn UiPort>,
}

impl ImportHistory {
    pub fn new(
        dataset: Arc<dyn DatasetPort>,
        cipher: Arc<dyn FieldCipherPort>,
        guard: CredentialGuard,
        registry: ContentRegistry,
        ui: Arc<dyn UiPort>,
    ) -> Self {
        Self {
            dataset,
            cipher,
            guard,
            registry,
            ui,
        }
    }

    pub fn execute(&self, password: SecretString) -> Result<ImportReport, PipelineError> {
        let _span = info_span!("usecase.import_history.execute").entered();

        let result = self.run(&password);
        self.cipher.clear();
        drop(password);
        self.ui.set_progress(0);
        self.ui.set_progress_visible(false);

        match &result {
            Ok(report) => {
                info!(texts = report.texts, images = report.images, "import completed");
                self.ui.set_status("Imported successfully");
            }
            Err(PipelineError::NoSuchDataset) => {
                self.ui.set_status("No content to load. Use save to store entries first.");
            }
            Err(err) => {
                warn!(error = %err, "import failed");
                self.ui.set_status(&format!("Import failed: {err}"));
            }
        }
        result
    }

    fn run(&self, password: &SecretString) -> Result<ImportReport, PipelineError> {
        if !self.dataset.exists() {
            return Err(PipelineError::NoSuchDataset);
        }
        let mut session = self
            .dataset
            .connect()
            .map_err(|e| PipelineError::StoreUnavailable(e.to_string()))?;

        let stored = session
            .current_password_hash()
            .map_err(PipelineError::Store)?
            .ok_or(PipelineError::NoSuchCredential)?;
        if !self.guard.verify(password.expose(), &stored)? {
            return Err(PipelineError::IncorrectPassword);
        }

        let mut staging = ContentHistory::new();
        for kind in ContentKind::ALL {
            match self.read_kind(session.as_mut(), kind, password) {
                Ok(entries) => {
                    for entry in entries {
                        staging
                            .restore(entry)
                            .map_err(|e| PipelineError::CorruptRow {
                                kind,
                                reason: e.to_string(),
                            })?;
                    }
                }
                Err(err) => {
                    warn!(%kind, error = %err, "import stopped, keeping completed kinds");
                    self.commit(staging);
                    return Err(err);
                }
            }
        }

        let report = ImportReport {
            texts: staging.count(ContentKind::Text),
            images: staging.count(ContentKind::Image),
        };
        self.commit(staging);
        Ok(report)
    }

    /// Decrypts every row of `kind`. Entries are only returned when the whole
    /// kind decoded cleanly and forms the sequence `1..=n`.
    fn read_kind(
        &self,
        session: &mut dyn DatasetSession,
        kind: ContentKind,
        password: &SecretString,
    ) -> Result<Vec<ContentEntry>, PipelineError> {
        let rows = session.get_all(kind).map_err(|e| match e {
            StoreError::CorruptRow(reason) => PipelineError::CorruptRow { kind, reason },
            other => PipelineError::Store(other),
        })?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        self.ui.set_status(&format!("Reading {kind} entries"));
        self.ui.set_progress(0);
        self.ui.set_progress_visible(true);

        let total = rows.len();
        let mut entries = Vec::with_capacity(total);
        for (position, row) in rows.iter().enumerate() {
            let entry = self.decode_row(kind, row, password)?;
            let expected = position as u32 + 1;
            if entry.index.get() != expected {
                return Err(PipelineError::CorruptRow {
                    kind,
                    reason: format!("index {} where {expected} was expected", entry.index),
                });
            }
            entries.push(entry);
            self.ui.set_progress(percent(position + 1, total));
        }
        Ok(entries)
    }

    fn decode_row(
        &self,
        kind: ContentKind,
        row: &StoredRow,
        password: &SecretString,
    ) -> Result<ContentEntry, PipelineError> {
        let corrupt = |reason: String| PipelineError::CorruptRow { kind, reason };

        let index = row
            .index
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(EntryIndex::new)
            .ok_or_else(|| corrupt(format!("invalid index {:?}", row.index)))?;

        let decrypt = |field: &str| {
            self.cipher
                .decrypt(field, password)
                .map_err(|_| PipelineError::DecryptError {
                    kind,
                    index: row.index.clone(),
                })
        };
        let content = decrypt(&row.content)?;
        let timestamp = decrypt(&row.timestamp)?;

        let timestamp_ms = timestamp
            .trim()
            .parse::<i64>()
            .map_err(|_| corrupt(format!("entry {index}: invalid timestamp")))?;
        let payload = ContentPayload::from_persisted_text(kind, content)
            .map_err(|e| corrupt(format!("entry {index}: {e}")))?;

        Ok(ContentEntry::new(index, timestamp_ms, payload))
    }

    /// Swaps the registry for `staged`, then redraws the UI from what the
    /// registry holds after the swap.
    fn commit(&self, staged: ContentHistory) {
        self.registry.replace(staged);
        let committed = self.registry.snapshot();
        self.ui.clear_all();
        for entry in committed.entries() {
            self.ui.add_entry(entry);
        }
    }
}
