pub mod connection;
pub mod dataset;
pub mod models;
pub mod schema;

pub use dataset::{SqliteDataset, SqliteSession};
