use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};

use super::{Backend, BackendError, ClusterId};
use crate::errors::{DedupError, Result};

/// Default name of the table holding band records.
pub const DEFAULT_TABLE: &str = "lsh_index";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable backend storing records in an SQLite table keyed by `(band_index, band_hash)`.
///
/// Several processes may open the same file; the primary key makes the first writer
/// of a key win across all of them.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    table: String,
    insert_sql: String,
    select_sql: String,
}

impl SqliteBackend {
    /// Opens (or creates) the store at `path`, creating `table` if it does not exist.
    ///
    /// # Errors
    ///
    /// [`DedupError::InvalidArgument`] is returned if `table` is not a plain identifier,
    /// and [`DedupError::BackendUnavailable`] if the database cannot be prepared.
    pub fn open<P>(path: P, table: &str) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        validate_table(table)?;
        let conn = Connection::open(path).map_err(BackendError::from)?;
        // Writers from other processes hold the file only for one statement.
        conn.busy_timeout(BUSY_TIMEOUT).map_err(BackendError::from)?;
        // WAL lets readers in other processes proceed during writes.
        conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))
            .map_err(BackendError::from)?;
        Self::with_connection(conn, table)
    }

    /// Creates a store living in memory, for tests and one-shot runs.
    pub fn open_in_memory(table: &str) -> Result<Self> {
        validate_table(table)?;
        let conn = Connection::open_in_memory().map_err(BackendError::from)?;
        Self::with_connection(conn, table)
    }

    fn with_connection(conn: Connection, table: &str) -> Result<Self> {
        conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                band_index INTEGER NOT NULL,
                band_hash TEXT NOT NULL,
                cluster_id TEXT NOT NULL,
                PRIMARY KEY (band_index, band_hash)
            );
            "#
        ))
        .map_err(BackendError::from)?;
        tracing::debug!(table, "opened sqlite backend");
        Ok(Self {
            conn: Mutex::new(conn),
            table: table.to_string(),
            insert_sql: format!(
                "INSERT INTO {table} (band_index, band_hash, cluster_id) VALUES (?1, ?2, ?3) \
                 ON CONFLICT (band_index, band_hash) DO NOTHING"
            ),
            select_sql: format!(
                "SELECT cluster_id FROM {table} WHERE band_index = ?1 AND band_hash = ?2"
            ),
        })
    }

    /// Gets the number of records.
    pub fn len(&self) -> Result<usize, BackendError> {
        let conn = self.lock()?;
        let table = &self.table;
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Checks if no record is stored.
    pub fn is_empty(&self) -> Result<bool, BackendError> {
        Ok(self.len()? == 0)
    }

    /// Gets the name of the table holding the records.
    pub fn table(&self) -> &str {
        &self.table
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, BackendError> {
        self.conn.lock().map_err(|_| BackendError::Poisoned)
    }

    fn select(
        &self,
        conn: &Connection,
        index: i64,
        hash: &str,
    ) -> Result<Option<ClusterId>, BackendError> {
        let value: Option<String> = conn
            .prepare_cached(&self.select_sql)?
            .query_row(params![index, hash], |row| row.get(0))
            .optional()?;
        value
            .map(|value| {
                ClusterId::parse_str(&value).map_err(|_| BackendError::Corrupt {
                    index: index as usize,
                    value,
                })
            })
            .transpose()
    }
}

impl Backend for SqliteBackend {
    fn assign(
        &self,
        index: usize,
        hash: &str,
        cluster: ClusterId,
    ) -> Result<ClusterId, BackendError> {
        let index = to_sql_index(index)?;
        let conn = self.lock()?;
        let created = conn
            .prepare_cached(&self.insert_sql)?
            .execute(params![index, hash, cluster.to_string()])?;
        let stored = self
            .select(&conn, index, hash)?
            .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tracing::trace!(index, hash, %stored, created = created == 1, "assign");
        Ok(stored)
    }

    fn query(&self, index: usize, hash: &str) -> Result<Option<ClusterId>, BackendError> {
        let index = to_sql_index(index)?;
        let conn = self.lock()?;
        self.select(&conn, index, hash)
    }
}

fn to_sql_index(index: usize) -> Result<i64, BackendError> {
    i64::try_from(index).map_err(|e| BackendError::Other(Box::new(e)))
}

fn validate_table(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DedupError::input(format!(
            "table name must be a plain identifier, got {table:?}."
        )))
    }
}
