mod registrar;

pub use registrar::{GlobalHotkeyRegistrar, HotkeyHandler};
