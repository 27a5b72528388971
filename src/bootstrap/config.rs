//! Configuration loading and data directory resolution.
//!
//! `load_config` only reads and parses; defaults for missing keys come from
//! `AppConfig::from_toml`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cs_core::config::AppConfig;
use cs_platform::DirsAppDirsAdapter;

/// Loads `AppConfig` from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML, or if a
/// known key has the wrong type.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Loads the config at `path` if given, else defaults.
pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(AppConfig::default()),
    }
}

/// `--data-dir` wins over the config file, which wins over the platform
/// default.
pub fn resolve_data_dir(cli: Option<PathBuf>, config: &AppConfig) -> anyhow::Result<PathBuf> {
    if let Some(dir) = cli.or_else(|| config.storage.data_dir.clone()) {
        return Ok(dir);
    }
    Ok(DirsAppDirsAdapter::new().data_dir()?)
}
