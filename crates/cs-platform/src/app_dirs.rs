use std::path::PathBuf;

use thiserror::Error;

const APP_DIR_NAME: &str = "clipstash";
const PROFILE_ENV: &str = "CLIPSTASH_PROFILE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppDirsError {
    #[error("platform local data directory is unavailable")]
    DataLocalDirUnavailable,
}

fn resolved_app_dir_name() -> String {
    match std::env::var(PROFILE_ENV) {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

/// Resolves the default data directory from the platform's local data dir.
pub struct DirsAppDirsAdapter {
    base_data_local_dir_override: Option<PathBuf>,
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_data_local_dir_override: None,
        }
    }

    #[cfg(test)]
    pub fn with_base_data_local_dir(base: PathBuf) -> Self {
        Self {
            base_data_local_dir_override: Some(base),
        }
    }

    fn base_data_local_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_data_local_dir_override {
            return Some(base.clone());
        }
        dirs::data_local_dir()
    }

    /// `<data_local_dir>/clipstash`, or `clipstash-<profile>` when
    /// `CLIPSTASH_PROFILE` is set.
    pub fn data_dir(&self) -> Result<PathBuf, AppDirsError> {
        let base = self
            .base_data_local_dir()
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;
        Ok(base.join(resolved_app_dir_name()))
    }
}
