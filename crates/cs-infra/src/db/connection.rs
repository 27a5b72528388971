use std::path::Path;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, info};

use cs_core::ports::StoreError;

/// Embed all diesel migrations at compile time
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Opens a connection to the SQLite file at `path` and brings its schema up
/// to date. SQLite creates the file if it is missing.
pub fn open_and_migrate(path: &Path) -> Result<SqliteConnection, StoreError> {
    let url = path
        .to_str()
        .ok_or_else(|| StoreError::Unavailable(format!("non UTF-8 path: {}", path.display())))?;

    let mut conn = SqliteConnection::establish(url)
        .map_err(|e| StoreError::Unavailable(format!("{}: {e}", path.display())))?;

    run_migrations(&mut conn)?;
    Ok(conn)
}

fn run_migrations(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Unavailable(format!("migration failed: {e}")))?;

    if applied.is_empty() {
        debug!("dataset schema up to date");
    } else {
        info!(count = applied.len(), "applied dataset migrations");
    }
    Ok(())
}
