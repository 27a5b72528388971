mod dispatcher;

pub use dispatcher::HotkeyDispatcher;
