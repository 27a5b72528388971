//! Captured clipboard content and the in-memory history that holds it.

mod entry;
mod history;
mod registry;

pub use entry::*;
pub use history::*;
pub use registry::*;
