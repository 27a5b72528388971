use std::sync::Arc;

use cs_core::clipboard::ClipboardGate;
use cs_core::crypto::CredentialGuard;
use cs_core::ports::{
    ClockPort, DatasetPort, FieldCipherPort, HotkeyRegistrarPort, PasteInjectorPort,
    SettingsPort, UiPort,
};

/// Everything [`crate::App`] needs from the outer layers.
pub struct AppDeps {
    pub dataset: Arc<dyn DatasetPort>,
    pub cipher: Arc<dyn FieldCipherPort>,
    pub credential_guard: CredentialGuard,
    pub ui: Arc<dyn UiPort>,
    pub clock: Arc<dyn ClockPort>,
    pub settings: Arc<dyn SettingsPort>,
    pub gate: Arc<ClipboardGate>,
    pub hotkey_registrar: Arc<dyn HotkeyRegistrarPort>,
    pub paste_injector: Arc<dyn PasteInjectorPort>,
}
