//! Validator — structural invariants enforced before any mutation.
//!
//! In-batch duplicate keys resolve last-write-wins with a warning per
//! discarded record (hard failures under `strict_duplicates`). The
//! referential and text checks are pure functions over the immutable
//! batch and catalog snapshot, so they run in parallel.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use concord_core::config::ReconcileConfig;
use concord_core::errors::{ValidationError, ValidationFailure};
use concord_core::models::{DuplicateWarning, LoadBatch, MappingKey, MappingRecord, ValidatedBatch};
use concord_core::traits::CatalogSnapshot;

pub struct Validator<'a> {
    config: &'a ReconcileConfig,
    catalog: &'a CatalogSnapshot,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a ReconcileConfig, catalog: &'a CatalogSnapshot) -> Self {
        Self { config, catalog }
    }

    /// Validate a batch. On success the batch comes back deduplicated
    /// and otherwise unchanged; on failure nothing has been written and
    /// every violation is reported at once.
    pub fn validate(&self, batch: LoadBatch) -> Result<ValidatedBatch, ValidationFailure> {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        // Last-write-wins dedup, preserving load order of survivors.
        let mut kept: Vec<(usize, MappingRecord)> = Vec::with_capacity(batch.records.len());
        let mut by_key: FxHashMap<MappingKey, usize> = FxHashMap::default();
        for (idx, record) in batch.records.into_iter().enumerate() {
            let key = record.key();
            match by_key.get(&key) {
                Some(&pos) => {
                    let earlier_idx = kept[pos].0;
                    if self.config.strict_duplicates {
                        violations.push(ValidationError::DuplicateKey {
                            standard_id: key.standard_id,
                            control_id: key.control_id,
                            first_index: earlier_idx,
                            dup_index: idx,
                        });
                    } else {
                        tracing::warn!(
                            standard_id = key.standard_id,
                            control_id = key.control_id,
                            kept = idx,
                            discarded = earlier_idx,
                            "duplicate mapping key resolved last-write-wins"
                        );
                        warnings.push(DuplicateWarning {
                            key,
                            kept_index: idx,
                            discarded_index: earlier_idx,
                        });
                    }
                    kept[pos] = (idx, record);
                }
                None => {
                    by_key.insert(key, kept.len());
                    kept.push((idx, record));
                }
            }
        }

        violations.par_extend(
            kept.par_iter()
                .flat_map_iter(|(_, record)| self.check_record(record)),
        );

        if !violations.is_empty() {
            return Err(ValidationFailure { violations });
        }

        Ok(ValidatedBatch {
            standards: batch.standards,
            records: kept.into_iter().map(|(_, record)| record).collect(),
            warnings,
        })
    }

    fn check_record(&self, record: &MappingRecord) -> Vec<ValidationError> {
        let mut violations = Vec::new();
        let key = record.key();

        if !self.catalog.has_standard(key.standard_id) {
            violations.push(ValidationError::UnknownStandard {
                standard_id: key.standard_id,
            });
        }
        if !self.catalog.has_control(key.control_id) {
            violations.push(ValidationError::UnknownControl {
                standard_id: key.standard_id,
                control_id: key.control_id,
            });
        }
        if let Some(v) = self.check_text("selection_parameters", &record.selection_parameters, key)
        {
            violations.push(v);
        }
        if let Some(v) = self.check_text("guidance", &record.guidance, key) {
            violations.push(v);
        }
        violations
    }

    fn check_text(
        &self,
        field: &'static str,
        value: &Option<String>,
        key: MappingKey,
    ) -> Option<ValidationError> {
        let text = value.as_deref()?;
        if text.len() > self.config.max_text_len {
            return Some(ValidationError::TextTooLong {
                field,
                standard_id: key.standard_id,
                control_id: key.control_id,
                len: text.len(),
                max: self.config.max_text_len,
            });
        }
        // Newlines and tabs are legitimate in guidance prose; anything
        // else from the control range is not.
        if text
            .chars()
            .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
        {
            return Some(ValidationError::InvalidText {
                field,
                standard_id: key.standard_id,
                control_id: key.control_id,
            });
        }
        None
    }
}
