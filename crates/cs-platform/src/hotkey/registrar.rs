//! Global hotkeys through the `global-hotkey` crate.
//!
//! `GlobalHotKeyManager` is not `Send` on every platform, so it lives on a
//! dedicated thread that serves register/unregister requests. A second thread
//! drains `GlobalHotKeyEvent::receiver()` and calls the handler for every
//! press of a registered binding.

use std::collections::HashMap;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use anyhow::{anyhow, Context, Result};
use global_hotkey::{
    hotkey::{Code, HotKey, Modifiers},
    Error as GlobalHotkeyError, GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
};
use tracing::{debug, info, warn};

use cs_core::hotkey::{HotkeyBinding, ModifierSet};
use cs_core::ports::HotkeyRegistrarPort;

/// Called on the event thread for each press of a registered binding.
pub type HotkeyHandler = Arc<dyn Fn(HotkeyBinding) + Send + Sync>;

type BindingMap = Arc<Mutex<HashMap<u32, HotkeyBinding>>>;

enum Request {
    Register(HotKey, String, Sender<Result<()>>),
    Unregister(HotKey, String, Sender<Result<()>>),
}

pub struct GlobalHotkeyRegistrar {
    requests: Mutex<Sender<Request>>,
    bindings: BindingMap,
}

fn to_modifiers(set: ModifierSet) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    if set.ctrl {
        modifiers |= Modifiers::CONTROL;
    }
    if set.alt {
        modifiers |= Modifiers::ALT;
    }
    if set.shift {
        modifiers |= Modifiers::SHIFT;
    }
    modifiers
}

fn to_code(digit: u8) -> Result<Code> {
    Ok(match digit {
        1 => Code::Digit1,
        2 => Code::Digit2,
        3 => Code::Digit3,
        4 => Code::Digit4,
        5 => Code::Digit5,
        6 => Code::Digit6,
        7 => Code::Digit7,
        8 => Code::Digit8,
        9 => Code::Digit9,
        other => return Err(anyhow!("no key code for digit {other}")),
    })
}

fn to_hotkey(binding: &HotkeyBinding) -> Result<HotKey> {
    Ok(HotKey::new(
        Some(to_modifiers(binding.modifiers)),
        to_code(binding.digit.get())?,
    ))
}

fn describe_error(e: GlobalHotkeyError, binding: &str) -> anyhow::Error {
    match e {
        GlobalHotkeyError::AlreadyRegistered(hk) => anyhow!(
            "hotkey '{binding}' is already registered (id: {})",
            hk.id()
        ),
        GlobalHotkeyError::FailedToRegister(msg) => {
            anyhow!("system rejected hotkey '{binding}': {msg}")
        }
        GlobalHotkeyError::OsError(os_err) => {
            anyhow!("OS error registering hotkey '{binding}': {os_err}")
        }
        other => anyhow!("hotkey '{binding}' failed: {other}"),
    }
}

impl GlobalHotkeyRegistrar {
    /// Spawns the manager and event threads.
    pub fn start(handler: HotkeyHandler) -> Result<Self> {
        let bindings: BindingMap = Arc::new(Mutex::new(HashMap::new()));
        let (tx, rx) = mpsc::channel::<Request>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        thread::Builder::new()
            .name("hotkey-manager".into())
            .spawn(move || {
                let manager = match GlobalHotKeyManager::new() {
                    Ok(manager) => {
                        let _ = ready_tx.send(Ok(()));
                        manager
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(anyhow!("hotkey manager unavailable: {e}")));
                        return;
                    }
                };

                for request in rx {
                    match request {
                        Request::Register(hotkey, label, reply) => {
                            let result = manager
                                .register(hotkey)
                                .map_err(|e| describe_error(e, &label));
                            let _ = reply.send(result);
                        }
                        Request::Unregister(hotkey, label, reply) => {
                            let result = manager
                                .unregister(hotkey)
                                .map_err(|e| describe_error(e, &label));
                            let _ = reply.send(result);
                        }
                    }
                }
                debug!("hotkey manager thread exiting");
            })
            .context("spawn hotkey manager thread failed")?;

        ready_rx
            .recv()
            .context("hotkey manager thread exited during start-up")??;

        let pump_bindings = bindings.clone();
        thread::Builder::new()
            .name("hotkey-events".into())
            .spawn(move || {
                let receiver = GlobalHotKeyEvent::receiver();
                while let Ok(event) = receiver.recv() {
                    if event.state() != HotKeyState::Pressed {
                        continue;
                    }
                    let binding = lock(&pump_bindings).get(&event.id()).copied();
                    match binding {
                        Some(binding) => handler(binding),
                        None => debug!(id = event.id(), "event for unknown hotkey"),
                    }
                }
            })
            .context("spawn hotkey event thread failed")?;

        info!("global hotkey service started");
        Ok(Self {
            requests: Mutex::new(tx),
            bindings,
        })
    }

    fn call(&self, make: impl FnOnce(Sender<Result<()>>) -> Request) -> Result<()> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .send(make(reply_tx))
            .map_err(|_| anyhow!("hotkey manager thread is gone"))?;
        reply_rx
            .recv()
            .map_err(|_| anyhow!("hotkey manager thread dropped the request"))?
    }
}

fn lock(bindings: &BindingMap) -> MutexGuard<'_, HashMap<u32, HotkeyBinding>> {
    bindings.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HotkeyRegistrarPort for GlobalHotkeyRegistrar {
    fn register(&self, binding: &HotkeyBinding) -> Result<()> {
        let hotkey = to_hotkey(binding)?;
        let id = hotkey.id();
        self.call(|reply| Request::Register(hotkey, binding.to_string(), reply))
            .with_context(|| format!("register {binding}"))?;
        lock(&self.bindings).insert(id, *binding);
        debug!(%binding, id, "hotkey registered");
        Ok(())
    }

    fn unregister(&self, binding: &HotkeyBinding) -> Result<()> {
        let hotkey = to_hotkey(binding)?;
        let id = hotkey.id();
        let label = binding.to_string();
        // Still bound at OS level on failure, so presses keep resolving.
        if let Err(err) = self.call(|reply| Request::Unregister(hotkey, label, reply)) {
            warn!(%binding, error = %err, "hotkey unregister failed");
            return Err(err);
        }
        lock(&self.bindings).remove(&id);
        debug!(%binding, id, "hotkey unregistered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::hotkey::Digit;

    #[test]
    fn bindings_map_to_distinct_hotkeys() {
        let mods: ModifierSet = "Ctrl+Alt".parse().unwrap();
        let one = to_hotkey(&HotkeyBinding::new(mods, Digit::new(1).unwrap())).unwrap();
        let two = to_hotkey(&HotkeyBinding::new(mods, Digit::new(2).unwrap())).unwrap();
        assert_ne!(one.id(), two.id());
        assert_eq!(one.key, Code::Digit1);
        assert_eq!(one.mods, Modifiers::CONTROL | Modifiers::ALT);
    }

    #[test]
    fn modifier_sets_change_the_id() {
        let digit = Digit::new(3).unwrap();
        let a = to_hotkey(&HotkeyBinding::new("Ctrl+Alt".parse().unwrap(), digit)).unwrap();
        let b = to_hotkey(&HotkeyBinding::new("Ctrl+Shift".parse().unwrap(), digit)).unwrap();
        assert_ne!(a.id(), b.id());
    }

    /// A registrar served by a scripted manager thread instead of the OS.
    fn scripted_registrar(unregister_ok: bool) -> GlobalHotkeyRegistrar {
        let (tx, rx) = mpsc::channel::<Request>();
        thread::spawn(move || {
            for request in rx {
                match request {
                    Request::Register(_, _, reply) => {
                        let _ = reply.send(Ok(()));
                    }
                    Request::Unregister(_, label, reply) => {
                        let result = if unregister_ok {
                            Ok(())
                        } else {
                            Err(anyhow!("OS refused to release '{label}'"))
                        };
                        let _ = reply.send(result);
                    }
                }
            }
        });
        GlobalHotkeyRegistrar {
            requests: Mutex::new(tx),
            bindings: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn binding(digit: u8) -> HotkeyBinding {
        HotkeyBinding::new(ModifierSet::CTRL_ALT, Digit::new(digit).unwrap())
    }

    #[test]
    fn failed_unregister_keeps_the_binding_resolvable() {
        let registrar = scripted_registrar(false);
        let b = binding(4);
        let id = to_hotkey(&b).unwrap().id();

        registrar.register(&b).unwrap();
        assert!(registrar.unregister(&b).is_err());

        assert_eq!(lock(&registrar.bindings).get(&id), Some(&b));
    }

    #[test]
    fn successful_unregister_forgets_the_binding() {
        let registrar = scripted_registrar(true);
        let b = binding(4);

        registrar.register(&b).unwrap();
        registrar.unregister(&b).unwrap();

        assert!(lock(&registrar.bindings).is_empty());
    }

    #[test]
    fn out_of_range_digit_has_no_code() {
        assert!(to_code(0).is_err());
        assert!(to_code(10).is_err());
    }
}
