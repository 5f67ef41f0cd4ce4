//! Queries for the load_history table — append-only log of
//! reconciliation runs.

use concord_core::errors::StorageError;
use concord_core::models::ApplyReport;
use rusqlite::{params, Connection};

/// A load history record.
#[derive(Debug, Clone)]
pub struct LoadHistoryRow {
    pub id: i64,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub source: String,
    pub format_version: Option<i64>,
    pub standards_affected: Option<i64>,
    pub records_in: Option<i64>,
    pub inserted: Option<i64>,
    pub updated: Option<i64>,
    pub deleted: Option<i64>,
    pub unchanged: Option<i64>,
    pub duration_ms: Option<i64>,
    pub status: String,
    pub error: Option<String>,
}

/// Insert a new run record (status = 'running'). Returns the row id.
pub fn insert_run_start(
    conn: &Connection,
    started_at: i64,
    source: &str,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO load_history (started_at, source, status) VALUES (?1, ?2, 'running')",
        params![started_at, source],
    )
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    Ok(conn.last_insert_rowid())
}

/// Update a run record with completion data.
#[allow(clippy::too_many_arguments)]
pub fn update_run_complete(
    conn: &Connection,
    id: i64,
    completed_at: i64,
    format_version: Option<u32>,
    standards_affected: i64,
    records_in: i64,
    report: &ApplyReport,
    status: &str,
    error: Option<&str>,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE load_history SET
            completed_at = ?1, format_version = ?2, standards_affected = ?3,
            records_in = ?4, inserted = ?5, updated = ?6, deleted = ?7,
            unchanged = ?8, duration_ms = ?9, status = ?10, error = ?11
         WHERE id = ?12",
        params![
            completed_at,
            format_version,
            standards_affected,
            records_in,
            report.inserted as i64,
            report.updated as i64,
            report.deleted as i64,
            report.unchanged as i64,
            report.duration_ms as i64,
            status,
            error,
            id
        ],
    )
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    Ok(())
}

/// Query recent run entries, most recent first.
pub fn query_recent(conn: &Connection, limit: usize) -> Result<Vec<LoadHistoryRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, started_at, completed_at, source, format_version,
                    standards_affected, records_in, inserted, updated, deleted,
                    unchanged, duration_ms, status, error
             FROM load_history ORDER BY started_at DESC, id DESC LIMIT ?1",
        )
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok(LoadHistoryRow {
                id: row.get(0)?,
                started_at: row.get(1)?,
                completed_at: row.get(2)?,
                source: row.get(3)?,
                format_version: row.get(4)?,
                standards_affected: row.get(5)?,
                records_in: row.get(6)?,
                inserted: row.get(7)?,
                updated: row.get(8)?,
                deleted: row.get(9)?,
                unchanged: row.get(10)?,
                duration_ms: row.get(11)?,
                status: row.get(12)?,
                error: row.get(13)?,
            })
        })
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}

/// Count total run entries.
pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM load_history", [], |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}
