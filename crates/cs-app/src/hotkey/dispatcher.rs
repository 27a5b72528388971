use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use cs_core::clipboard::{ClipboardGate, ReplayError};
use cs_core::content::ContentRegistry;
use cs_core::hotkey::{HotkeyBinding, ShortcutConfig};
use cs_core::ports::{HotkeyRegistrarPort, PasteInjectorPort};

use crate::error::HotkeyError;

/// Owns the set of registered replay hotkeys and performs the replay.
pub struct HotkeyDispatcher {
    registrar: Arc<dyn HotkeyRegistrarPort>,
    paste: Arc<dyn PasteInjectorPort>,
    gate: Arc<ClipboardGate>,
    registry: ContentRegistry,
    active: Mutex<Vec<HotkeyBinding>>,
}

impl HotkeyDispatcher {
    pub fn new(
        registrar: Arc<dyn HotkeyRegistrarPort>,
        paste: Arc<dyn PasteInjectorPort>,
        gate: Arc<ClipboardGate>,
        registry: ContentRegistry,
    ) -> Self {
        Self {
            registrar,
            paste,
            gate,
            registry,
            active: Mutex::new(Vec::new()),
        }
    }

    fn active(&self) -> MutexGuard<'_, Vec<HotkeyBinding>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn active_bindings(&self) -> Vec<HotkeyBinding> {
        self.active().clone()
    }

    /// Replaces the registered set with the bindings of `config`.
    ///
    /// An invalid config is rejected before anything is unregistered.
    /// Otherwise every current binding is released first, then the new set is
    /// registered as a batch: if any binding fails, the ones registered so far
    /// are released again and nothing stays bound.
    pub fn apply(&self, config: &ShortcutConfig) -> Result<usize, HotkeyError> {
        let bindings = config.bindings()?;
        let mut active = self.active();

        for binding in active.drain(..) {
            if let Err(err) = self.registrar.unregister(&binding) {
                warn!(%binding, error = %err, "unregister failed");
            }
        }

        let mut registered: Vec<HotkeyBinding> = Vec::with_capacity(bindings.len());
        for binding in bindings {
            if let Err(err) = self.registrar.register(&binding) {
                for done in registered.iter().rev() {
                    if let Err(undo) = self.registrar.unregister(done) {
                        warn!(binding = %done, error = %undo, "rollback unregister failed");
                    }
                }
                warn!(%binding, error = %err, "hotkey registration failed, rolled back");
                return Err(HotkeyError::HotkeyRegistrationFailure {
                    binding: binding.to_string(),
                    reason: format!("{err:#}"),
                });
            }
            registered.push(binding);
        }

        let count = registered.len();
        *active = registered;
        info!(count, enabled = config.enabled, "hotkeys applied");
        Ok(count)
    }

    /// Handles a press of `binding`.
    ///
    /// Returns `Ok(false)` when nothing was pasted: the binding is not
    /// registered, or its slot is beyond the number of text entries.
    pub fn trigger(&self, binding: HotkeyBinding) -> Result<bool, HotkeyError> {
        if !self.active().contains(&binding) {
            debug!(%binding, "ignoring unregistered hotkey");
            return Ok(false);
        }

        let slot = binding.slot();
        let Some(text) = self.registry.recent_text(slot) else {
            debug!(slot, "no text entry for slot");
            return Ok(false);
        };

        self.gate
            .replay_text(&text, || self.paste.inject_paste())
            .map_err(|e| match e {
                ReplayError::Clipboard(e) => HotkeyError::Clipboard(format!("{e:#}")),
                ReplayError::Paste(e) => HotkeyError::Paste(format!("{e:#}")),
            })?;

        debug!(slot, "replayed text entry");
        Ok(true)
    }
}
