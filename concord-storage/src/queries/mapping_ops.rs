//! Insert, update, delete, and row-fetch ops for standard_control_mapping.

use concord_core::errors::StorageError;
use concord_core::models::{MappingKey, MappingRecord, MappingRow};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

/// Insert a single mapping. Both stamps are set to `stamp`.
/// Returns the assigned row id.
pub fn insert_mapping(
    conn: &Connection,
    record: &MappingRecord,
    stamp: i64,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO standard_control_mapping
            (standard_id, control_id, selection_parameters, guidance, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![
            record.standard_id,
            record.control_id,
            record.selection_parameters,
            record.guidance,
            stamp,
        ],
    )
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    Ok(conn.last_insert_rowid())
}

/// Replace the text fields of an existing row and bump `updated_at`.
/// `created_at` is preserved — it records the row's original load batch.
pub fn update_mapping_text(
    conn: &Connection,
    id: i64,
    record: &MappingRecord,
    stamp: i64,
) -> Result<(), StorageError> {
    let rows = conn
        .execute(
            "UPDATE standard_control_mapping
             SET selection_parameters = ?2, guidance = ?3, updated_at = ?4
             WHERE id = ?1",
            params![id, record.selection_parameters, record.guidance, stamp],
        )
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    if rows == 0 {
        return Err(StorageError::SqliteError {
            message: format!("update_mapping_text: no row with id {id}"),
        });
    }
    Ok(())
}

/// Delete a mapping row by id.
pub fn delete_mapping(conn: &Connection, id: i64) -> Result<(), StorageError> {
    conn.execute(
        "DELETE FROM standard_control_mapping WHERE id = ?1",
        params![id],
    )
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    Ok(())
}

/// Fetch a row by its logical key.
pub fn get_by_key(conn: &Connection, key: MappingKey) -> Result<Option<MappingRow>, StorageError> {
    conn.query_row(
        "SELECT id, standard_id, control_id, selection_parameters, guidance,
                created_at, updated_at
         FROM standard_control_mapping
         WHERE standard_id = ?1 AND control_id = ?2",
        params![key.standard_id, key.control_id],
        row_to_mapping,
    )
    .optional()
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })
}

/// All persisted rows, ordered by key for deterministic diffing.
pub fn all_rows(conn: &Connection) -> Result<Vec<MappingRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, standard_id, control_id, selection_parameters, guidance,
                    created_at, updated_at
             FROM standard_control_mapping
             ORDER BY standard_id, control_id",
        )
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    let rows = stmt
        .query_map([], row_to_mapping)
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}

/// Persisted rows belonging to the given standards, ordered by key.
pub fn rows_for_standards(
    conn: &Connection,
    standard_ids: &[i64],
) -> Result<Vec<MappingRow>, StorageError> {
    if standard_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; standard_ids.len()].join(",");
    let sql = format!(
        "SELECT id, standard_id, control_id, selection_parameters, guidance,
                created_at, updated_at
         FROM standard_control_mapping
         WHERE standard_id IN ({placeholders})
         ORDER BY standard_id, control_id"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    let rows = stmt
        .query_map(params_from_iter(standard_ids.iter()), row_to_mapping)
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}

/// Delete every row belonging to the given standards.
/// Returns the number of rows removed.
pub fn delete_for_standards(
    conn: &Connection,
    standard_ids: &[i64],
) -> Result<usize, StorageError> {
    if standard_ids.is_empty() {
        return Ok(0);
    }
    let placeholders = vec!["?"; standard_ids.len()].join(",");
    let sql =
        format!("DELETE FROM standard_control_mapping WHERE standard_id IN ({placeholders})");
    conn.execute(&sql, params_from_iter(standard_ids.iter()))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}

/// Delete every row except those belonging to the given standards.
/// Returns the number of rows removed.
pub fn delete_except_standards(
    conn: &Connection,
    standard_ids: &[i64],
) -> Result<usize, StorageError> {
    if standard_ids.is_empty() {
        return delete_all(conn);
    }
    let placeholders = vec!["?"; standard_ids.len()].join(",");
    let sql = format!(
        "DELETE FROM standard_control_mapping WHERE standard_id NOT IN ({placeholders})"
    );
    conn.execute(&sql, params_from_iter(standard_ids.iter()))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}

/// Delete every row of the mapping table. Returns the number removed.
pub fn delete_all(conn: &Connection) -> Result<usize, StorageError> {
    conn.execute("DELETE FROM standard_control_mapping", [])
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}

/// Total row count.
pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM standard_control_mapping", [], |row| {
        row.get(0)
    })
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })
}

fn row_to_mapping(row: &rusqlite::Row<'_>) -> rusqlite::Result<MappingRow> {
    Ok(MappingRow {
        id: row.get(0)?,
        standard_id: row.get(1)?,
        control_id: row.get(2)?,
        selection_parameters: row.get(3)?,
        guidance: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
