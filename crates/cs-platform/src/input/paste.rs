use anyhow::{anyhow, Result};
use enigo::{
    Direction::{Click, Press, Release},
    Enigo, Key, Keyboard, Settings,
};
use tracing::debug;

use cs_core::ports::PasteInjectorPort;

#[cfg(target_os = "macos")]
const PASTE_MODIFIER: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const PASTE_MODIFIER: Key = Key::Control;

/// Sends the platform paste shortcut (Ctrl+V, Cmd+V on macOS).
///
/// A new `Enigo` is created per call; the connection is not `Send` on every
/// platform.
#[derive(Debug, Default)]
pub struct EnigoPasteInjector;

impl EnigoPasteInjector {
    pub fn new() -> Self {
        Self
    }
}

impl PasteInjectorPort for EnigoPasteInjector {
    fn inject_paste(&self) -> Result<()> {
        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| anyhow!("input connection failed: {e}"))?;

        // the hotkey's own modifiers are usually still held down
        for (held, name) in [(Key::Alt, "Alt"), (Key::Shift, "Shift")] {
            enigo
                .key(held, Release)
                .map_err(|e| anyhow!("release {name} failed: {e}"))?;
        }

        enigo
            .key(PASTE_MODIFIER, Press)
            .map_err(|e| anyhow!("press paste modifier failed: {e}"))?;
        let clicked = enigo.key(Key::Unicode('v'), Click);
        enigo
            .key(PASTE_MODIFIER, Release)
            .map_err(|e| anyhow!("release paste modifier failed: {e}"))?;
        clicked.map_err(|e| anyhow!("paste key failed: {e}"))?;

        debug!("paste injected");
        Ok(())
    }
}
