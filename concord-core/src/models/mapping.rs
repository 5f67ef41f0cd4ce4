//! Standard→control mapping records, as loaded and as persisted.

use serde::{Deserialize, Serialize};

/// The logical identity of a mapping: one control within one standard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MappingKey {
    pub standard_id: i64,
    pub control_id: i64,
}

/// A candidate mapping as produced by the Source Loader.
/// Carries no surrogate id or stamps — those belong to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub standard_id: i64,
    pub control_id: i64,
    /// Jurisdiction-specific parameter values layered onto the base
    /// control, e.g. "AC-1 (c)(1) [at least annually]".
    pub selection_parameters: Option<String>,
    /// Supplementary requirement or guidance prose.
    pub guidance: Option<String>,
}

impl MappingRecord {
    pub fn key(&self) -> MappingKey {
        MappingKey {
            standard_id: self.standard_id,
            control_id: self.control_id,
        }
    }
}

/// A persisted row of the `standard_control_mapping` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRow {
    pub id: i64,
    pub standard_id: i64,
    pub control_id: i64,
    pub selection_parameters: Option<String>,
    pub guidance: Option<String>,
    /// Epoch milliseconds; shared by all rows written in one run.
    pub created_at: i64,
    pub updated_at: i64,
}

impl MappingRow {
    pub fn key(&self) -> MappingKey {
        MappingKey {
            standard_id: self.standard_id,
            control_id: self.control_id,
        }
    }

    /// True when the row's text fields already match the incoming record.
    pub fn text_matches(&self, record: &MappingRecord) -> bool {
        self.selection_parameters == record.selection_parameters
            && self.guidance == record.guidance
    }
}
