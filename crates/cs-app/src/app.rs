use std::sync::Arc;

use anyhow::Context;
use tracing::{info, instrument, warn};

use cs_core::content::{ContentRegistry, HistoryError};
use cs_core::hotkey::ShortcutConfig;
use cs_core::ports::{SettingsPort, UiPort};
use cs_core::security::SecretString;

use crate::deps::AppDeps;
use crate::error::{HotkeyError, PipelineError};
use crate::hotkey::HotkeyDispatcher;
use crate::usecases::{
    CaptureClipboard, ExportHistory, ExportOptions, ExportOutcome, ExtractUrls, ImportHistory,
    ImportReport,
};

/// The running session: one content registry plus the use cases over it.
///
/// Entry points the presentation layer calls (save, load, settings change,
/// URL extraction) are methods here.
pub struct App {
    registry: ContentRegistry,
    capture: Arc<CaptureClipboard>,
    export: Arc<ExportHistory>,
    import: Arc<ImportHistory>,
    urls: ExtractUrls,
    dispatcher: Arc<HotkeyDispatcher>,
    settings: Arc<dyn SettingsPort>,
    ui: Arc<dyn UiPort>,
}

impl App {
    pub fn new(deps: AppDeps) -> Self {
        let registry = ContentRegistry::new();

        let capture = Arc::new(CaptureClipboard::new(
            registry.clone(),
            deps.clock.clone(),
            deps.ui.clone(),
        ));
        let export = Arc::new(ExportHistory::new(
            deps.dataset.clone(),
            deps.cipher.clone(),
            deps.credential_guard.clone(),
            deps.ui.clone(),
        ));
        let import = Arc::new(ImportHistory::new(
            deps.dataset,
            deps.cipher,
            deps.credential_guard,
            registry.clone(),
            deps.ui.clone(),
        ));
        let dispatcher = Arc::new(HotkeyDispatcher::new(
            deps.hotkey_registrar,
            deps.paste_injector,
            deps.gate,
            registry.clone(),
        ));

        Self {
            urls: ExtractUrls::new(registry.clone()),
            registry,
            capture,
            export,
            import,
            dispatcher,
            settings: deps.settings,
            ui: deps.ui,
        }
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    /// Handler to hand to the clipboard watcher runtime.
    pub fn capture_handler(&self) -> Arc<CaptureClipboard> {
        self.capture.clone()
    }

    pub fn dispatcher(&self) -> Arc<HotkeyDispatcher> {
        self.dispatcher.clone()
    }

    /// Saves a snapshot of the current history on a blocking worker.
    #[instrument(skip(self, password))]
    pub async fn export(
        &self,
        password: SecretString,
        options: ExportOptions,
    ) -> Result<ExportOutcome, PipelineError> {
        let history = self.registry.snapshot();
        let export = self.export.clone();
        tokio::task::spawn_blocking(move || export.execute(&history, password, options))
            .await
            .map_err(|e| PipelineError::Worker(e.to_string()))?
    }

    /// Loads the saved history on a blocking worker.
    #[instrument(skip(self, password))]
    pub async fn import(&self, password: SecretString) -> Result<ImportReport, PipelineError> {
        let import = self.import.clone();
        tokio::task::spawn_blocking(move || import.execute(password))
            .await
            .map_err(|e| PipelineError::Worker(e.to_string()))?
    }

    pub fn urls(&self, text_index: u32) -> Result<Vec<String>, HistoryError> {
        self.urls.execute(text_index)
    }

    /// Registers the hotkeys from the persisted settings.
    pub async fn apply_saved_shortcuts(&self) -> anyhow::Result<usize> {
        let settings = self.settings.load().await.context("load settings")?;
        let count = self.dispatcher.apply(&settings.shortcuts)?;
        Ok(count)
    }

    /// Persists `config` and re-registers the hotkeys from it.
    ///
    /// An invalid config is rejected before anything is saved. When the new
    /// set cannot be registered the settings stay saved and no hotkey is
    /// bound; the error is reported on the status line.
    #[instrument(skip(self))]
    pub async fn update_shortcuts(&self, config: ShortcutConfig) -> anyhow::Result<usize> {
        config.validate().map_err(HotkeyError::from)?;

        let mut settings = self.settings.load().await.context("load settings")?;
        settings.shortcuts = config;
        self.settings
            .save(&settings)
            .await
            .context("save settings")?;

        match self.dispatcher.apply(&config) {
            Ok(count) => {
                info!(count, "shortcuts updated");
                self.ui.set_status(&format!("{count} shortcuts active"));
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "shortcuts saved but not applied");
                self.ui.set_status(&format!("Shortcuts not applied: {err}"));
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::{fast_guard, MemoryDataset, RecordingUi, TaggingCipher};
    use async_trait::async_trait;
    use cs_core::clipboard::ClipboardGate;
    use cs_core::content::{ContentKind, ContentPayload, ImagePayload};
    use cs_core::hotkey::{HotkeyBinding, ModifierSet};
    use cs_core::ports::{
        ClockPort, HotkeyRegistrarPort, PasteInjectorPort, SystemClipboardPort,
    };
    use cs_core::settings::Settings;
    use std::sync::Mutex;

    struct NoClipboard;

    impl SystemClipboardPort for NoClipboard {
        fn contains_text(&self) -> anyhow::Result<bool> {
            Ok(false)
        }
        fn contains_image(&self) -> anyhow::Result<bool> {
            Ok(false)
        }
        fn read_text(&self) -> anyhow::Result<String> {
            anyhow::bail!("empty")
        }
        fn read_image(&self) -> anyhow::Result<ImagePayload> {
            anyhow::bail!("empty")
        }
        fn write_text(&self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingRegistrar {
        registered: Mutex<Vec<HotkeyBinding>>,
    }

    impl HotkeyRegistrarPort for CountingRegistrar {
        fn register(&self, binding: &HotkeyBinding) -> anyhow::Result<()> {
            self.registered.lock().unwrap().push(*binding);
            Ok(())
        }
        fn unregister(&self, binding: &HotkeyBinding) -> anyhow::Result<()> {
            self.registered.lock().unwrap().retain(|b| b != binding);
            Ok(())
        }
    }

    struct NoPaste;

    impl PasteInjectorPort for NoPaste {
        fn inject_paste(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct Clock;

    impl ClockPort for Clock {
        fn now_ms(&self) -> i64 {
            1_700_000_000_000
        }
    }

    #[derive(Default)]
    struct MemorySettings {
        saved: Mutex<Option<Settings>>,
    }

    #[async_trait]
    impl SettingsPort for MemorySettings {
        async fn load(&self) -> anyhow::Result<Settings> {
            Ok(self.saved.lock().unwrap().clone().unwrap_or_default())
        }
        async fn save(&self, settings: &Settings) -> anyhow::Result<()> {
            *self.saved.lock().unwrap() = Some(settings.clone());
            Ok(())
        }
    }

    struct Harness {
        app: App,
        dataset: Arc<MemoryDataset>,
        registrar: Arc<CountingRegistrar>,
        settings: Arc<MemorySettings>,
        ui: Arc<RecordingUi>,
    }

    fn harness() -> Harness {
        let dataset = Arc::new(MemoryDataset::default());
        let registrar = Arc::new(CountingRegistrar::default());
        let settings = Arc::new(MemorySettings::default());
        let ui = Arc::new(RecordingUi::default());
        let app = App::new(AppDeps {
            dataset: dataset.clone(),
            cipher: Arc::new(TaggingCipher::default()),
            credential_guard: fast_guard(),
            ui: ui.clone(),
            clock: Arc::new(Clock),
            settings: settings.clone(),
            gate: Arc::new(ClipboardGate::new(Arc::new(NoClipboard))),
            hotkey_registrar: registrar.clone(),
            paste_injector: Arc::new(NoPaste),
        });
        Harness {
            app,
            dataset,
            registrar,
            settings,
            ui,
        }
    }

    #[tokio::test]
    async fn export_then_import_restores_history() {
        let h = harness();
        h.app
            .capture_handler()
            .execute(ContentPayload::Text("hello".into()));
        h.app
            .capture_handler()
            .execute(ContentPayload::Text("world".into()));

        let outcome = h
            .app
            .export(SecretString::from("pw1"), ExportOptions::default())
            .await
            .unwrap();
        assert!(matches!(outcome, ExportOutcome::Exported(_)));
        assert_eq!(h.dataset.rows(ContentKind::Text).len(), 2);

        h.app.registry().clear_all();
        let report = h.app.import(SecretString::from("pw1")).await.unwrap();

        assert_eq!(report.texts, 2);
        assert_eq!(h.app.registry().recent_text(1).as_deref(), Some("world"));
        assert_eq!(h.ui.last_status().as_deref(), Some("Imported successfully"));
    }

    #[tokio::test]
    async fn urls_come_from_the_indexed_text_entry() {
        let h = harness();
        h.app
            .capture_handler()
            .execute(ContentPayload::Text("see https://example.com/a.".into()));

        assert_eq!(h.app.urls(1).unwrap(), vec!["https://example.com/a"]);
        assert!(h.app.urls(2).is_err());
    }

    #[tokio::test]
    async fn update_shortcuts_saves_and_applies() {
        let h = harness();
        let config = ShortcutConfig {
            enabled: true,
            modifiers: ModifierSet {
                ctrl: true,
                alt: false,
                shift: true,
            },
            digit_count: 3,
        };

        assert_eq!(h.app.update_shortcuts(config).await.unwrap(), 3);
        assert_eq!(h.registrar.registered.lock().unwrap().len(), 3);
        assert_eq!(
            h.settings.saved.lock().unwrap().as_ref().map(|s| s.shortcuts),
            Some(config)
        );
    }

    #[tokio::test]
    async fn invalid_shortcuts_are_not_saved() {
        let h = harness();
        let config = ShortcutConfig {
            digit_count: 12,
            ..ShortcutConfig::default()
        };

        assert!(h.app.update_shortcuts(config).await.is_err());
        assert!(h.settings.saved.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn saved_shortcuts_default_to_nine_bindings() {
        let h = harness();
        assert_eq!(h.app.apply_saved_shortcuts().await.unwrap(), 9);
    }
}
