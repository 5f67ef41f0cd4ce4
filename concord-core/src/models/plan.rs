//! The reconciliation plan: one tagged action per affected key.

use serde::{Deserialize, Serialize};

use super::mapping::{MappingKey, MappingRecord};

/// One planned operation against the mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlanAction {
    /// Key exists only in the incoming batch.
    Insert { record: MappingRecord },
    /// Key exists on both sides with differing text fields.
    Update { id: i64, record: MappingRecord },
    /// Key exists only in the persisted state and is not protected.
    Delete { id: i64, key: MappingKey },
    /// Key exists on both sides and is identical, or is protected
    /// from deletion by the retention policy.
    NoOp { id: i64, key: MappingKey },
}

impl PlanAction {
    pub fn key(&self) -> MappingKey {
        match self {
            PlanAction::Insert { record } | PlanAction::Update { record, .. } => record.key(),
            PlanAction::Delete { key, .. } | PlanAction::NoOp { key, .. } => *key,
        }
    }
}

/// A deterministic, ordered, serializable plan. Replaying a serialized
/// plan against a copy of the pre-state store yields the same post-state
/// as applying it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub actions: Vec<PlanAction>,
}

impl Plan {
    /// Number of effective operations (everything but NoOp).
    pub fn op_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| !matches!(a, PlanAction::NoOp { .. }))
            .count()
    }

    /// True when applying the plan would change nothing.
    pub fn is_noop(&self) -> bool {
        self.op_count() == 0
    }

    pub fn inserts(&self) -> usize {
        self.count(|a| matches!(a, PlanAction::Insert { .. }))
    }

    pub fn updates(&self) -> usize {
        self.count(|a| matches!(a, PlanAction::Update { .. }))
    }

    pub fn deletes(&self) -> usize {
        self.count(|a| matches!(a, PlanAction::Delete { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|a| matches!(a, PlanAction::NoOp { .. }))
    }

    fn count(&self, pred: impl Fn(&PlanAction) -> bool) -> usize {
        self.actions.iter().filter(|a| pred(a)).count()
    }
}
