//! DuckDB-backed dataset store
//!
//! Holds one root connection and hands each call its own cloned connection,
//! which is closed when the lease drops. Works against a database file or an
//! in-memory database.

use super::accessor::RowAccessor;
use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::types::{CompositeKey, NewRow, Row};
use duckdb::{params, Connection, ToSql};
use regex::Regex;
use std::ops::{Deref, Range};
use std::path::Path;
use std::sync::{LazyLock, Mutex};

/// Table name used when none is configured
pub const DEFAULT_TABLE: &str = "pagination_dataset";

const COLUMNS: &str = "id, name, age, city, created_at";

/// Predicate for "strictly before `(created_at, id)` in descending order"
const BEFORE_KEY: &str = "created_at < ? OR (created_at = ? AND id < ?)";

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("Invalid identifier regex")
});

/// Check that `name` can be spliced into SQL as a bare identifier
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_REGEX.is_match(name)
}

/// Dataset store on DuckDB
pub struct DuckDbStore {
    /// Root connection, only used to clone per-call connections
    root: Mutex<Connection>,
    /// Serializes id assignment on the write path
    writer: Mutex<()>,
    /// Table holding the dataset
    table: String,
    /// Database location (for logging)
    location: String,
}

/// A connection leased for the duration of one call
pub struct ConnectionLease {
    conn: Connection,
}

impl Deref for ConnectionLease {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for ConnectionLease {
    fn drop(&mut self) {
        tracing::trace!("Releasing storage connection");
    }
}

impl DuckDbStore {
    /// Open an in-memory store and create the schema
    pub fn open_in_memory(table: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::storage(format!("Failed to create DuckDB connection: {e}")))?;
        Self::with_connection(conn, table, ":memory:".to_string())
    }

    /// Open (or create) a file-backed store and create the schema
    pub fn open(path: &Path, table: &str) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| {
            Error::storage(format!("Failed to open DuckDB at {}: {e}", path.display()))
        })?;
        Self::with_connection(conn, table, path.display().to_string())
    }

    /// Open the store described by the database config
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        match &config.path {
            Some(path) => Self::open(path, &config.table),
            None => Self::open_in_memory(&config.table),
        }
    }

    fn with_connection(conn: Connection, table: &str, location: String) -> Result<Self> {
        if !is_valid_identifier(table) {
            return Err(Error::invalid_config(
                "database.table",
                format!("'{table}' is not a valid SQL identifier"),
            ));
        }

        let store = Self {
            root: Mutex::new(conn),
            writer: Mutex::new(()),
            table: table.to_string(),
            location,
        };
        store.ensure_schema()?;

        tracing::debug!("Opened store {} (table {})", store.location, store.table);
        Ok(store)
    }

    /// Lease a connection for one call
    pub fn lease(&self) -> Result<ConnectionLease> {
        let root = self
            .root
            .lock()
            .map_err(|_| Error::storage("Root connection lock poisoned"))?;
        let conn = root
            .try_clone()
            .map_err(|e| Error::storage(format!("Failed to open connection: {e}")))?;
        Ok(ConnectionLease { conn })
    }

    /// Create the table and the `(created_at, id)` index if missing
    pub fn ensure_schema(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id BIGINT PRIMARY KEY,
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                city TEXT NOT NULL,
                created_at BIGINT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS {table}_created_at_id_idx ON {table} (created_at, id);",
            table = self.table
        );

        self.lease()?
            .execute_batch(&sql)
            .map_err(|e| Error::storage(format!("Failed to create schema: {e}")))
    }

    /// Drop the table and recreate it empty
    pub fn reset(&self) -> Result<()> {
        let _guard = self.write_guard()?;
        self.lease()?
            .execute_batch(&format!("DROP TABLE IF EXISTS {};", self.table))
            .map_err(|e| Error::storage(format!("Failed to drop table: {e}")))?;
        self.ensure_schema()
    }

    /// Append rows, assigning ids after the current maximum.
    ///
    /// Returns the range of ids that were assigned.
    pub fn insert_rows(&self, rows: &[NewRow]) -> Result<Range<i64>> {
        let _guard = self.write_guard()?;
        let conn = self.lease()?;

        let first: i64 = conn
            .query_row(
                &format!("SELECT COALESCE(MAX(id), 0) + 1 FROM {}", self.table),
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::storage(format!("Failed to read next id: {e}")))?;

        let mut appender = conn
            .appender(&self.table)
            .map_err(|e| Error::storage(format!("Failed to open appender: {e}")))?;

        let mut next = first;
        for row in rows {
            appender
                .append_row(params![next, row.name, row.age, row.city, row.created_at])
                .map_err(|e| Error::storage(format!("Failed to append row: {e}")))?;
            next += 1;
        }

        appender
            .flush()
            .map_err(|e| Error::storage(format!("Failed to flush rows: {e}")))?;

        Ok(first..next)
    }

    /// Insert one row with an explicit id
    pub fn insert_row(&self, row: &Row) -> Result<()> {
        let _guard = self.write_guard()?;
        self.lease()?
            .execute(
                &format!("INSERT INTO {} ({COLUMNS}) VALUES (?, ?, ?, ?, ?)", self.table),
                params![row.id, row.name, row.age, row.city, row.created_at],
            )
            .map_err(|e| Error::storage(format!("Failed to insert row {}: {e}", row.id)))?;
        Ok(())
    }

    /// Total number of rows
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .lease()?
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.table), [], |row| {
                row.get(0)
            })
            .map_err(|e| Error::storage(format!("Failed to count rows: {e}")))?;
        Ok(count as u64)
    }

    /// Table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Database location (file path or `:memory:`)
    pub fn location(&self) -> &str {
        &self.location
    }

    fn write_guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|_| Error::storage("Writer lock poisoned"))
    }

    fn query_rows(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>> {
        tracing::debug!("Executing query: {}", sql);

        let conn = self.lease()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| Error::storage(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params, read_row)
            .map_err(|e| Error::storage(format!("Failed to execute query: {e}")))?
            .collect::<duckdb::Result<Vec<Row>>>()
            .map_err(|e| Error::storage(format!("Failed to read row: {e}")))?;

        Ok(rows)
    }
}

impl RowAccessor for DuckDbStore {
    fn scan_skip(&self, offset: u64, limit: u64) -> Result<Vec<Row>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {} ORDER BY id ASC LIMIT {limit} OFFSET {offset}",
            self.table
        );
        self.query_rows(&sql, &[])
    }

    fn scan_after_id(&self, after: Option<i64>, limit: u64) -> Result<Vec<Row>> {
        match after {
            Some(last_id) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM {} WHERE id > ? ORDER BY id ASC LIMIT {limit}",
                    self.table
                );
                self.query_rows(&sql, &[&last_id])
            }
            None => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM {} ORDER BY id ASC LIMIT {limit}",
                    self.table
                );
                self.query_rows(&sql, &[])
            }
        }
    }

    fn scan_before_key(&self, before: Option<CompositeKey>, limit: u64) -> Result<Vec<Row>> {
        match before {
            Some(key) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM {} WHERE {BEFORE_KEY} \
                     ORDER BY created_at DESC, id DESC LIMIT {limit}",
                    self.table
                );
                self.query_rows(&sql, &[&key.created_at, &key.created_at, &key.id])
            }
            None => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM {} ORDER BY created_at DESC, id DESC LIMIT {limit}",
                    self.table
                );
                self.query_rows(&sql, &[])
            }
        }
    }

    fn count_before_key(&self, key: CompositeKey) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {BEFORE_KEY}", self.table);
        tracing::debug!("Executing probe: {}", sql);

        let count: i64 = self
            .lease()?
            .query_row(&sql, params![key.created_at, key.created_at, key.id], |row| {
                row.get(0)
            })
            .map_err(|e| Error::storage(format!("Failed to count rows: {e}")))?;

        Ok(count as u64)
    }
}

/// Map a result row in `COLUMNS` order
fn read_row(row: &duckdb::Row<'_>) -> duckdb::Result<Row> {
    Ok(Row {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        city: row.get(3)?,
        created_at: row.get(4)?,
    })
}
