//! SQLite-backed store for projects, equations and templates.
//!
//! [`Database`] wraps one connection behind a mutex. Every operation locks
//! it for its own duration only, so a handle can be cloned freely into
//! request handlers. Operations are grouped by entity in the submodules.

mod calculations;
mod equations;
mod error;
mod library;
mod projects;
mod schema;
mod seed;
mod tasks;
mod templates;
mod validate;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use error::{DbError, DbResult};
pub use schema::TABLES;
pub use seed::SeedOutcome;

/// File name used when no database path is configured.
pub const DEFAULT_DB_FILE: &str = "mathmlparser.db";

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> DbResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    pub fn open_default() -> DbResult<Self> {
        Self::open(default_path()?)
    }

    pub fn open_memory() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        // Cascades and SET NULL rules only fire with enforcement on
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> DbResult<()> {
        let conn = self.conn()?;
        schema::run_migrations(&conn)
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

/// Platform data directory location of the database file.
pub fn default_path() -> DbResult<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "mathml-parser").ok_or(DbError::NoDataDir)?;
    Ok(dirs.data_dir().join(DEFAULT_DB_FILE))
}

// ============================================================
// Column helpers
// ============================================================

/// Encode an optional value for a JSON text column.
fn to_json<T: Serialize>(value: &Option<T>) -> DbResult<Option<String>> {
    value
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(DbError::from)
}

/// Decode a nullable JSON text column.
fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>> {
    let Some(text) = row.get::<_, Option<String>>(idx)? else {
        return Ok(None);
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    parse_datetime(idx, &row.get::<_, String>(idx)?)
}

fn optional_datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| parse_datetime(idx, &s))
        .transpose()
}

fn to_sql_datetime(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|dt| dt.to_rfc3339())
}

fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
