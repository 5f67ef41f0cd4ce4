//! Versioned schema migrations, tracked via `PRAGMA user_version`.
//!
//! Each migration is a SQL batch applied in its own transaction; the
//! version pragma is bumped in the same transaction, so a failed
//! migration leaves the schema at the previous version. Re-running is a
//! no-op for already-applied versions.

pub mod v001_initial;
pub mod v002_load_history;

use concord_core::errors::StorageError;
use rusqlite::Connection;

const MIGRATIONS: &[(i32, &str)] = &[
    (1, v001_initial::MIGRATION_SQL),
    (2, v002_load_history::MIGRATION_SQL),
];

/// Apply all pending migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    for &(version, sql) in MIGRATIONS {
        if version <= current {
            continue;
        }
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StorageError::SqliteError {
                message: format!("migration v{version} begin: {e}"),
            })?;
        tx.execute_batch(sql)
            .map_err(|e| StorageError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        tx.pragma_update(None, "user_version", version)
            .map_err(|e| StorageError::MigrationFailed {
                version,
                reason: format!("bump user_version: {e}"),
            })?;
        tx.commit().map_err(|e| StorageError::MigrationFailed {
            version,
            reason: format!("commit: {e}"),
        })?;
        tracing::debug!(version, "applied schema migration");
    }
    Ok(())
}

/// Current schema version of a database.
pub fn schema_version(conn: &Connection) -> Result<i32, StorageError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}
