//! Differ — minimal change plan from validated batch vs persisted rows.
//!
//! Keys both sides by (standard_id, control_id). Incoming-only keys
//! become inserts, persisted-only keys become deletes (unless the
//! standard is protected), differing text becomes an update, identical
//! rows become NoOps. The plan is ordered deletes → updates → inserts,
//! each sorted by key, so plans are deterministic and replayable.

use rustc_hash::FxHashMap;

use concord_core::config::ReconcileConfig;
use concord_core::models::{MappingKey, MappingRow, Plan, PlanAction, ValidatedBatch};

pub fn diff(batch: &ValidatedBatch, current: &[MappingRow], config: &ReconcileConfig) -> Plan {
    let incoming: FxHashMap<MappingKey, usize> = batch
        .records
        .iter()
        .enumerate()
        .map(|(idx, record)| (record.key(), idx))
        .collect();
    let persisted: FxHashMap<MappingKey, &MappingRow> =
        current.iter().map(|row| (row.key(), row)).collect();

    let mut deletes = Vec::new();
    let mut updates = Vec::new();
    let mut inserts = Vec::new();
    let mut noops = Vec::new();

    for row in current {
        let key = row.key();
        match incoming.get(&key) {
            None => {
                if config.is_protected(row.standard_id) {
                    tracing::debug!(
                        standard_id = row.standard_id,
                        control_id = row.control_id,
                        "row absent from batch but standard is protected, retaining"
                    );
                    noops.push(PlanAction::NoOp { id: row.id, key });
                } else {
                    deletes.push(PlanAction::Delete { id: row.id, key });
                }
            }
            Some(&idx) => {
                let record = &batch.records[idx];
                if row.text_matches(record) {
                    noops.push(PlanAction::NoOp { id: row.id, key });
                } else {
                    updates.push(PlanAction::Update {
                        id: row.id,
                        record: record.clone(),
                    });
                }
            }
        }
    }

    for record in &batch.records {
        if !persisted.contains_key(&record.key()) {
            inserts.push(PlanAction::Insert {
                record: record.clone(),
            });
        }
    }

    deletes.sort_by_key(|a| a.key());
    updates.sort_by_key(|a| a.key());
    inserts.sort_by_key(|a| a.key());
    noops.sort_by_key(|a| a.key());

    let mut actions = deletes;
    actions.extend(updates);
    actions.extend(inserts);
    actions.extend(noops);
    Plan { actions }
}
