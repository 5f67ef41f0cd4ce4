//! Identity-sequence management for standard_control_mapping.
//!
//! The sequence is SQLite's `sqlite_sequence` row for the table: `seq`
//! holds the last assigned id, so the next insert gets `seq + 1`.
//! `reset_to_max` is the rollback-path contract — the sequence restarts
//! at the maximum *surviving* id, never unconditionally at 1, so ids of
//! rows written by other processes are never handed out again.

use concord_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

const TABLE: &str = "standard_control_mapping";

/// The last id the sequence handed out, if any insert ever happened.
pub fn last_assigned_id(conn: &Connection) -> Result<Option<i64>, StorageError> {
    if !sequence_table_exists(conn)? {
        return Ok(None);
    }
    conn.query_row(
        "SELECT seq FROM sqlite_sequence WHERE name = ?1",
        params![TABLE],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })
}

/// Maximum id currently present in the table (0 when empty).
pub fn max_row_id(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row(
        "SELECT COALESCE(MAX(id), 0) FROM standard_control_mapping",
        [],
        |row| row.get(0),
    )
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })
}

/// Raise the sequence to the current maximum id if it has fallen behind.
/// Never lowers it — forward runs must not reuse ids. Returns the
/// resulting sequence value.
pub fn ensure_at_least_max(conn: &Connection) -> Result<i64, StorageError> {
    let max = max_row_id(conn)?;
    let current = last_assigned_id(conn)?.unwrap_or(0);
    if current >= max {
        return Ok(current);
    }
    set_seq(conn, max)?;
    Ok(max)
}

/// Reset the sequence to the maximum surviving id, so the next insert
/// gets `max + 1`. On an empty table this restarts ids at 1.
pub fn reset_to_max(conn: &Connection) -> Result<i64, StorageError> {
    let max = max_row_id(conn)?;
    set_seq(conn, max)?;
    Ok(max)
}

fn set_seq(conn: &Connection, value: i64) -> Result<(), StorageError> {
    if !sequence_table_exists(conn)? {
        // No AUTOINCREMENT insert has ever happened and there is nothing
        // to reset below zero.
        if value == 0 {
            return Ok(());
        }
        return Err(StorageError::SqliteError {
            message: "sqlite_sequence table missing".to_string(),
        });
    }
    let rows = conn
        .execute(
            "UPDATE sqlite_sequence SET seq = ?1 WHERE name = ?2",
            params![value, TABLE],
        )
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    if rows == 0 {
        conn.execute(
            "INSERT INTO sqlite_sequence (name, seq) VALUES (?1, ?2)",
            params![TABLE, value],
        )
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    }
    Ok(())
}

fn sequence_table_exists(conn: &Connection) -> Result<bool, StorageError> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence'",
        [],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })
}
