mod gate;

pub use gate::{ClipboardGate, ReplayError};
