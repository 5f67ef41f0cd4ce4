//! Applier — executes a plan against the store in one immediate
//! transaction. Either the whole plan commits or none of it does.

use std::time::Instant;

use rusqlite::Connection;

use concord_core::errors::{ApplyError, StorageError};
use concord_core::models::{ApplyReport, MappingKey, Plan, PlanAction};
use concord_storage::connection::writer::with_immediate_transaction;
use concord_storage::queries::{mapping_ops, sequence_ops};

/// Apply a plan. All inserts and updates stamp `created_at`/`updated_at`
/// from the single run `stamp`. On success the identity sequence is at
/// least the maximum assigned id; on any failure the transaction rolls
/// back and the table is untouched.
pub fn apply_plan(conn: &Connection, plan: &Plan, stamp: i64) -> Result<ApplyReport, ApplyError> {
    let start = Instant::now();

    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| ApplyError::Storage(StorageError::SqliteError {
            message: format!("apply begin: {e}"),
        }))?;

    let mut report = ApplyReport::default();
    for action in &plan.actions {
        if let Err(e) = apply_action(conn, action, stamp, &mut report) {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(e);
        }
    }
    if let Err(e) = sequence_ops::ensure_at_least_max(conn) {
        let _ = conn.execute_batch("ROLLBACK");
        return Err(ApplyError::Storage(e));
    }

    conn.execute_batch("COMMIT")
        .map_err(|e| ApplyError::TransactionAborted {
            reason: format!("commit failed: {e}"),
        })?;

    report.duration_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        inserted = report.inserted,
        updated = report.updated,
        deleted = report.deleted,
        unchanged = report.unchanged,
        duration_ms = report.duration_ms,
        "reconcile plan applied"
    );
    Ok(report)
}

fn apply_action(
    conn: &Connection,
    action: &PlanAction,
    stamp: i64,
    report: &mut ApplyReport,
) -> Result<(), ApplyError> {
    match action {
        PlanAction::Insert { record } => {
            mapping_ops::insert_mapping(conn, record, stamp)
                .map_err(|e| classify(record.key(), e))?;
            report.inserted += 1;
        }
        PlanAction::Update { id, record } => {
            mapping_ops::update_mapping_text(conn, *id, record, stamp)
                .map_err(|e| classify(record.key(), e))?;
            report.updated += 1;
        }
        PlanAction::Delete { id, key } => {
            mapping_ops::delete_mapping(conn, *id).map_err(|e| classify(*key, e))?;
            report.deleted += 1;
        }
        PlanAction::NoOp { .. } => {
            report.unchanged += 1;
        }
    }
    Ok(())
}

/// Map a storage failure to the apply-phase taxonomy, attaching the
/// failing operation's key. Every SQLite constraint message carries the
/// "constraint failed" marker.
fn classify(key: MappingKey, err: StorageError) -> ApplyError {
    if let StorageError::SqliteError { message } = &err {
        if message.contains("constraint failed") {
            return ApplyError::ConstraintViolation {
                standard_id: key.standard_id,
                control_id: key.control_id,
                message: message.clone(),
            };
        }
    }
    ApplyError::Storage(err)
}

/// Rollback path: delete the rows the pipeline owns, then reset the
/// sequence to the maximum surviving id (never unconditionally to 1).
/// `managed` of `None` means every standard; `protected` rows survive
/// either way. Returns (rows deleted, resulting sequence value).
pub fn rollback(
    conn: &Connection,
    managed: Option<&[i64]>,
    protected: &[i64],
) -> Result<(u64, i64), ApplyError> {
    let (deleted, seq) = with_immediate_transaction(conn, |tx| {
        let deleted = match managed {
            Some(ids) => {
                let owned: Vec<i64> = ids
                    .iter()
                    .copied()
                    .filter(|id| !protected.contains(id))
                    .collect();
                mapping_ops::delete_for_standards(tx, &owned)?
            }
            None => {
                if protected.is_empty() {
                    mapping_ops::delete_all(tx)?
                } else {
                    mapping_ops::delete_except_standards(tx, protected)?
                }
            }
        };
        let seq = sequence_ops::reset_to_max(tx)?;
        Ok((deleted as u64, seq))
    })?;

    tracing::info!(deleted, sequence = seq, "rollback complete");
    Ok((deleted, seq))
}
