use serde::{Deserialize, Serialize};

use crate::hotkey::ShortcutConfig;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// User-editable settings persisted as JSON in the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub shortcuts: ShortcutConfig,
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            shortcuts: ShortcutConfig::default(),
        }
    }
}
