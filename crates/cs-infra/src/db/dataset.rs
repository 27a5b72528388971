use std::fs;
use std::path::{Path, PathBuf};

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info};

use cs_core::content::ContentKind;
use cs_core::crypto::PasswordHash;
use cs_core::ports::{DatasetPort, DatasetSession, StoreError, StoredRow};

use crate::db::connection::open_and_migrate;
use crate::db::models::{CredentialRow, NewCredentialRow};
use crate::db::schema::t_credential;

/// Runs `$body` with `$table` bound to the content table of `$kind`.
macro_rules! with_content_table {
    ($kind:expr, $table:ident => $body:expr) => {
        match $kind {
            ContentKind::Text => {
                use crate::db::schema::t_text_content as $table;
                $body
            }
            ContentKind::Image => {
                use crate::db::schema::t_image_content as $table;
                $body
            }
        }
    };
}

fn query_err(e: diesel::result::Error) -> StoreError {
    StoreError::Query(e.to_string())
}

/// A dataset stored in a single SQLite file.
pub struct SqliteDataset {
    path: PathBuf,
}

impl SqliteDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetPort for SqliteDataset {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn create_new(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                StoreError::Unavailable(format!("create dataset dir failed: {}: {e}", dir.display()))
            })?;
        }
        open_and_migrate(&self.path)?;
        info!(path = %self.path.display(), "created dataset");
        Ok(())
    }

    fn connect(&self) -> Result<Box<dyn DatasetSession>, StoreError> {
        if !self.exists() {
            return Err(StoreError::Unavailable(format!(
                "dataset not found: {}",
                self.path.display()
            )));
        }
        let conn = open_and_migrate(&self.path)?;
        debug!(path = %self.path.display(), "dataset session opened");
        Ok(Box::new(SqliteSession { conn }))
    }
}

/// An open dataset connection. The connection closes on drop.
pub struct SqliteSession {
    conn: SqliteConnection,
}

impl SqliteSession {
    fn current_credential(&mut self) -> Result<Option<CredentialRow>, StoreError> {
        t_credential::table
            .order(t_credential::id.desc())
            .select(CredentialRow::as_select())
            .first(&mut self.conn)
            .optional()
            .map_err(query_err)
    }

    fn require_current_id(&mut self) -> Result<i32, StoreError> {
        self.current_credential()?
            .map(|row| row.id)
            .ok_or_else(|| StoreError::Query("dataset has no current credential".into()))
    }
}

impl DatasetSession for SqliteSession {
    fn get_all(&mut self, kind: ContentKind) -> Result<Vec<StoredRow>, StoreError> {
        let Some(current) = self.current_credential()? else {
            return Ok(Vec::new());
        };

        let rows: Vec<(String, String, String)> = with_content_table!(kind, table => {
            table::table
                .filter(table::credential_id.eq(current.id))
                .order(table::id.asc())
                .select((table::entry_index, table::content, table::captured_at))
                .load(&mut self.conn)
                .map_err(query_err)?
        });

        let mut rows: Vec<StoredRow> = rows
            .into_iter()
            .map(|(index, content, timestamp)| StoredRow {
                index,
                content,
                timestamp,
            })
            .collect();
        // stable: rows with unparsable indices keep their relative order at the end
        rows.sort_by_key(|row| row.index.trim().parse::<u64>().unwrap_or(u64::MAX));
        Ok(rows)
    }

    fn set(&mut self, kind: ContentKind, row: &StoredRow) -> Result<(), StoreError> {
        let owner = self.require_current_id()?;

        with_content_table!(kind, table => {
            diesel::insert_into(table::table)
                .values((
                    table::credential_id.eq(owner),
                    table::entry_index.eq(&row.index),
                    table::content.eq(&row.content),
                    table::captured_at.eq(&row.timestamp),
                ))
                .execute(&mut self.conn)
                .map_err(query_err)?
        });
        Ok(())
    }

    fn delete_all_for_current_credential(
        &mut self,
        kind: ContentKind,
    ) -> Result<usize, StoreError> {
        let Some(current) = self.current_credential()? else {
            return Ok(0);
        };

        let removed = with_content_table!(kind, table => {
            diesel::delete(table::table.filter(table::credential_id.eq(current.id)))
                .execute(&mut self.conn)
                .map_err(query_err)?
        });
        debug!(%kind, removed, "deleted rows of current credential");
        Ok(removed)
    }

    fn current_credential_id(&mut self) -> Result<Option<i64>, StoreError> {
        Ok(self.current_credential()?.map(|row| i64::from(row.id)))
    }

    fn current_password_hash(&mut self) -> Result<Option<PasswordHash>, StoreError> {
        Ok(self
            .current_credential()?
            .map(|row| PasswordHash::from_stored(row.password_hash)))
    }

    fn create_credential(&mut self, hash: &PasswordHash) -> Result<i64, StoreError> {
        let id: i32 = diesel::insert_into(t_credential::table)
            .values(&NewCredentialRow {
                password_hash: hash.as_str(),
            })
            .returning(t_credential::id)
            .get_result(&mut self.conn)
            .map_err(query_err)?;
        Ok(i64::from(id))
    }

    fn delete_credential(&mut self) -> Result<(), StoreError> {
        if let Some(current) = self.current_credential()? {
            diesel::delete(t_credential::table.filter(t_credential::id.eq(current.id)))
                .execute(&mut self.conn)
                .map_err(query_err)?;
        }
        Ok(())
    }
}
