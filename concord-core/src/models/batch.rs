//! Batches flowing between the loader and the validator.

use serde::{Deserialize, Serialize};

use super::mapping::{MappingKey, MappingRecord};

/// The ordered output of the Source Loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBatch {
    /// Declared format version of the source document set.
    pub format_version: u32,
    /// Every standard the batch speaks for, in load order, deduplicated.
    /// A standard with zero records still appears here — its presence is
    /// what authorizes full removal of its persisted rows.
    pub standards: Vec<i64>,
    /// Candidate records in load order.
    pub records: Vec<MappingRecord>,
}

/// An in-batch duplicate that was resolved last-write-wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateWarning {
    pub key: MappingKey,
    /// Load-order index of the record that won.
    pub kept_index: usize,
    /// Load-order index of the earlier record that was discarded.
    pub discarded_index: usize,
}

/// A batch that passed validation: deduplicated, referentially sound,
/// text fields within bounds. Ready for the differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    pub standards: Vec<i64>,
    /// Deduplicated records, preserving the load order of the surviving
    /// occurrence of each key.
    pub records: Vec<MappingRecord>,
    /// Duplicates that were resolved rather than rejected.
    pub warnings: Vec<DuplicateWarning>,
}
