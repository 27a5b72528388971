use anyhow::Result;

use crate::hotkey::HotkeyBinding;

/// OS-level global hotkey registration.
pub trait HotkeyRegistrarPort: Send + Sync {
    fn register(&self, binding: &HotkeyBinding) -> Result<()>;
    fn unregister(&self, binding: &HotkeyBinding) -> Result<()>;
}

/// Synthesizes the platform paste shortcut into the focused window.
pub trait PasteInjectorPort: Send + Sync {
    fn inject_paste(&self) -> Result<()>;
}
