mod console_ui;

pub use console_ui::{render_entry, ConsoleUi};
