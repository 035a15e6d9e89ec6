//! Error types for store operations.

use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// The referenced row does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Input failed field validation before reaching SQLite.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// SQLite rejected the write (foreign key, NOT NULL, CHECK).
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A JSON column could not be encoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A schema migration failed and was rolled back.
    #[error("Migration {version} ({name}) failed: {source}")]
    Migration {
        version: &'static str,
        name: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other SQLite failure.
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => Self::Constraint(err.to_string()),
            _ => Self::Sqlite(err),
        }
    }
}

impl DbError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn foreign_key_failures_become_constraint_errors() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        conn.execute_batch(
            "CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (id INTEGER PRIMARY KEY, parent_id INTEGER NOT NULL REFERENCES parent(id));",
        )
        .unwrap();

        let err: DbError = conn
            .execute("INSERT INTO child (parent_id) VALUES (42)", [])
            .unwrap_err()
            .into();

        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn other_sqlite_failures_pass_through() {
        let conn = Connection::open_in_memory().unwrap();
        let err: DbError = conn.execute("SELECT * FROM missing", []).unwrap_err().into();
        assert!(matches!(err, DbError::Sqlite(_)));
    }
}
