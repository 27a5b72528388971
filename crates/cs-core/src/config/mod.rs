//! Static application configuration (TOML), loaded once at start-up.
//!
//! This module only maps TOML onto plain data. Path resolution and file I/O
//! happen in the binary's bootstrap.

mod app_config;

pub use app_config::{AppConfig, StorageConfig, WatcherConfig};
