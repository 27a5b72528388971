//! Start-up: config, tracing, dependency wiring and the command loop.

pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use self::config::{load_or_default, resolve_data_dir};
pub use run::run;
pub use self::tracing::init_tracing_subscriber;
pub use wiring::wire_dependencies;
