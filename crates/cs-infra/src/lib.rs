pub mod db;
pub mod security;
pub mod settings;
pub mod time;

pub use db::SqliteDataset;
pub use security::XChaChaFieldCipher;
pub use settings::FileSettingsRepository;
pub use time::SystemClock;
