use std::path::PathBuf;

pub const DEFAULT_DATASET_FILE: &str = "contents.db";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub watcher: WatcherConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Explicit data directory. `None` means "use the platform default".
    pub data_dir: Option<PathBuf>,
    /// Dataset file name, relative to the data directory.
    pub dataset_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherConfig {
    pub poll_interval_ms: u64,
    pub channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: None,
                dataset_file: DEFAULT_DATASET_FILE.to_string(),
            },
            watcher: WatcherConfig {
                poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
                channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            },
        }
    }
}

impl AppConfig {
    /// Maps a parsed TOML document onto `AppConfig`. Missing keys keep their
    /// defaults; keys of the wrong type are errors.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(storage) = toml_value.get("storage") {
            if let Some(v) = storage.get("data_dir") {
                let dir = v
                    .as_str()
                    .ok_or_else(|| anyhow::anyhow!("storage.data_dir must be a string"))?;
                if !dir.is_empty() {
                    config.storage.data_dir = Some(PathBuf::from(dir));
                }
            }
            if let Some(v) = storage.get("dataset_file") {
                config.storage.dataset_file = v
                    .as_str()
                    .ok_or_else(|| anyhow::anyhow!("storage.dataset_file must be a string"))?
                    .to_string();
            }
        }

        if let Some(watcher) = toml_value.get("watcher") {
            if let Some(v) = watcher.get("poll_interval_ms") {
                config.watcher.poll_interval_ms = positive(v, "watcher.poll_interval_ms")?;
            }
            if let Some(v) = watcher.get("channel_capacity") {
                config.watcher.channel_capacity =
                    positive(v, "watcher.channel_capacity")? as usize;
            }
        }

        Ok(config)
    }

    /// Dataset path inside `data_dir`.
    pub fn dataset_path(&self, data_dir: &std::path::Path) -> PathBuf {
        data_dir.join(&self.storage.dataset_file)
    }
}

fn positive(value: &toml::Value, key: &str) -> anyhow::Result<u64> {
    match value.as_integer() {
        Some(n) if n > 0 => Ok(n as u64),
        _ => anyhow::bail!("{key} must be a positive integer"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let value: Value = toml::from_str("").unwrap();
        assert_eq!(AppConfig::from_toml(&value).unwrap(), AppConfig::default());
    }

    #[test]
    fn parses_all_keys() {
        let value: Value = toml::from_str(
            r#"
            [storage]
            data_dir = "/tmp/clipstash"
            dataset_file = "history.db"

            [watcher]
            poll_interval_ms = 250
            channel_capacity = 8
            "#,
        )
        .unwrap();

        let config = AppConfig::from_toml(&value).unwrap();
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/clipstash")));
        assert_eq!(config.storage.dataset_file, "history.db");
        assert_eq!(config.watcher.poll_interval_ms, 250);
        assert_eq!(config.watcher.channel_capacity, 8);
    }

    #[test]
    fn empty_data_dir_means_platform_default() {
        let value: Value = toml::from_str("[storage]\ndata_dir = \"\"").unwrap();
        assert_eq!(AppConfig::from_toml(&value).unwrap().storage.data_dir, None);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let value: Value = toml::from_str("[watcher]\npoll_interval_ms = 0").unwrap();
        assert!(AppConfig::from_toml(&value).is_err());
    }

    #[test]
    fn dataset_path_joins_data_dir() {
        let config = AppConfig::default();
        assert_eq!(
            config.dataset_path(std::path::Path::new("/data")),
            PathBuf::from("/data/contents.db")
        );
    }
}
