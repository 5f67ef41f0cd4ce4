//! Reads (and test/bootstrap seeding) for the parent catalogs.

use concord_core::errors::StorageError;
use rusqlite::{params, Connection};
use rustc_hash::FxHashSet;

/// Seed a standard. Used by deployment bootstrap and tests.
pub fn insert_standard(conn: &Connection, id: i64, name: &str) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO standards (id, name) VALUES (?1, ?2)",
        params![id, name],
    )
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    Ok(())
}

/// Seed a control. Used by deployment bootstrap and tests.
pub fn insert_control(
    conn: &Connection,
    id: i64,
    identifier: &str,
    title: Option<&str>,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO controls (id, identifier, title) VALUES (?1, ?2, ?3)",
        params![id, identifier, title],
    )
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    Ok(())
}

/// Every standard id in the catalog.
pub fn standard_ids(conn: &Connection) -> Result<FxHashSet<i64>, StorageError> {
    collect_ids(conn, "SELECT id FROM standards")
}

/// Every control id in the catalog.
pub fn control_ids(conn: &Connection) -> Result<FxHashSet<i64>, StorageError> {
    collect_ids(conn, "SELECT id FROM controls")
}

fn collect_ids(conn: &Connection, sql: &str) -> Result<FxHashSet<i64>, StorageError> {
    let mut stmt = conn.prepare(sql).map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    ids.collect::<Result<FxHashSet<_>, _>>()
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}
