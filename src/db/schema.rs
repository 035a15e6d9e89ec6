use rusqlite::Connection;

use super::error::{DbError, DbResult};

struct Migration {
    version: &'static str,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: "001",
    name: "initial",
    sql: include_str!("migrations/001_initial.sql"),
}];

/// Tables created by the migrations, in dependency order.
pub const TABLES: &[&str] = &[
    "project_templates",
    "projects",
    "tasks",
    "task_cards",
    "parsed_equations",
    "variables",
    "calculation_results",
    "task_templates",
    "equation_library",
];

pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations tracking table
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )?;

    let applied = get_applied_migrations(conn)?;

    for migration in MIGRATIONS {
        if !applied.iter().any(|v| v == migration.version) {
            apply_migration(conn, migration)?;
        }
    }

    Ok(())
}

fn get_applied_migrations(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations ORDER BY version")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(versions)
}

fn apply_migration(conn: &Connection, migration: &Migration) -> DbResult<()> {
    tracing::info!(
        "Applying migration {}: {}",
        migration.version,
        migration.name
    );

    let fail = |source: rusqlite::Error| DbError::Migration {
        version: migration.version,
        name: migration.name,
        source,
    };

    // Schema change and bookkeeping commit together or not at all
    let tx = conn.unchecked_transaction().map_err(fail)?;
    tx.execute_batch(migration.sql).map_err(fail)?;
    tx.execute(
        "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)",
        (
            migration.version,
            migration.name,
            chrono::Utc::now().to_rfc3339(),
        ),
    )
    .map_err(fail)?;
    tx.commit().map_err(fail)?;

    tracing::info!("Migration {} applied successfully", migration.version);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_migrations_run_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in TABLES {
            assert!(table_exists(&conn, table), "missing table {table}");
        }

        let versions = get_applied_migrations(&conn).unwrap();
        assert_eq!(versions, vec!["001"]);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap(); // Should not fail

        let versions = get_applied_migrations(&conn).unwrap();
        assert_eq!(versions, vec!["001"]);
    }

    #[test]
    fn test_indexes_cover_lookup_columns() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let mut stmt = conn
            .prepare("SELECT tbl_name || '.' || name FROM sqlite_master WHERE type='index' AND name LIKE 'idx_%'")
            .unwrap();
        let indexes: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        for expected in [
            "projects.idx_projects_name",
            "equation_library.idx_equation_library_category",
            "equation_library.idx_equation_library_last_used",
            "calculation_results.idx_calculation_results_calculated_at",
            "task_templates.idx_task_templates_category",
        ] {
            assert!(indexes.iter().any(|i| i == expected), "missing index {expected}");
        }
    }
}
