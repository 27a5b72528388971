//! Assembly of the concrete adapters into an [`App`].
//!
//! This is the only module that depends on `cs-infra`, `cs-platform` and
//! `cs-app` at once. It builds; it does not decide.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use cs_app::{App, AppDeps, HotkeyDispatcher};
use cs_core::clipboard::ClipboardGate;
use cs_core::config::AppConfig;
use cs_core::crypto::CredentialGuard;
use cs_core::ports::UiPort;
use cs_infra::{FileSettingsRepository, SqliteDataset, SystemClock, XChaChaFieldCipher};
use cs_platform::hotkey::HotkeyHandler;
use cs_platform::{EnigoPasteInjector, GlobalHotkeyRegistrar, LocalClipboard, PollingClipboardRuntime};

pub const SETTINGS_FILE: &str = "settings.json";

pub type WiringResult<T> = Result<T, WiringError>;

#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Data directory initialization failed: {0}")]
    DataDir(String),

    #[error("Clipboard initialization failed: {0}")]
    ClipboardInit(String),

    #[error("Hotkey initialization failed: {0}")]
    HotkeyInit(String),
}

/// The assembled application plus the runtime pieces that live beside it.
pub struct Wired {
    pub app: Arc<App>,
    pub watcher: PollingClipboardRuntime,
    pub data_dir: PathBuf,
}

fn ensure_dir(dir: &Path) -> WiringResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        WiringError::DataDir(format!("Failed to create {}: {e}", dir.display()))
    })
}

/// Hotkey presses arrive before the dispatcher exists; they are dropped until
/// the slot is filled.
fn hotkey_handler(slot: Arc<OnceLock<Arc<HotkeyDispatcher>>>) -> HotkeyHandler {
    Arc::new(move |binding| {
        let Some(dispatcher) = slot.get() else {
            warn!(%binding, "hotkey pressed before start-up finished");
            return;
        };
        if let Err(err) = dispatcher.trigger(binding) {
            warn!(%binding, error = %err, "hotkey replay failed");
        }
    })
}

pub fn wire_dependencies(
    config: &AppConfig,
    data_dir: PathBuf,
    ui: Arc<dyn UiPort>,
) -> WiringResult<Wired> {
    ensure_dir(&data_dir)?;

    let dataset_path = config.dataset_path(&data_dir);
    info!(data_dir = %data_dir.display(), dataset = %dataset_path.display(), "wiring");

    let clipboard = LocalClipboard::new().map_err(|e| WiringError::ClipboardInit(format!("{e:#}")))?;
    let gate = Arc::new(ClipboardGate::new(Arc::new(clipboard)));

    let dispatcher_slot: Arc<OnceLock<Arc<HotkeyDispatcher>>> = Arc::new(OnceLock::new());
    let registrar = GlobalHotkeyRegistrar::start(hotkey_handler(dispatcher_slot.clone()))
        .map_err(|e| WiringError::HotkeyInit(format!("{e:#}")))?;

    let deps = AppDeps {
        dataset: Arc::new(SqliteDataset::new(dataset_path)),
        cipher: Arc::new(XChaChaFieldCipher::new()),
        credential_guard: CredentialGuard::new(),
        ui,
        clock: Arc::new(SystemClock),
        settings: Arc::new(FileSettingsRepository::new(data_dir.join(SETTINGS_FILE))),
        gate: gate.clone(),
        hotkey_registrar: Arc::new(registrar),
        paste_injector: Arc::new(EnigoPasteInjector::new()),
    };

    let app = Arc::new(App::new(deps));
    let _ = dispatcher_slot.set(app.dispatcher());

    let watcher = PollingClipboardRuntime::new(gate, app.capture_handler(), config.watcher.clone());

    Ok(Wired {
        app,
        watcher,
        data_dir,
    })
}
