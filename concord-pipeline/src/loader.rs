//! Source Loader — canonical mapping documents to an ordered LoadBatch.
//!
//! One document per standard, JSON, read in lexical filename order so a
//! re-load of the same source version yields the same sequence.

use std::path::PathBuf;

use rustc_hash::FxHashSet;
use serde::Deserialize;

use concord_core::constants::{SOURCE_DOCUMENT_EXT, SUPPORTED_SOURCE_FORMAT};
use concord_core::errors::SourceError;
use concord_core::models::{LoadBatch, MappingRecord};
use concord_core::traits::MappingSource;

/// On-disk shape of one canonical document.
#[derive(Debug, Deserialize)]
struct MappingDocument {
    format_version: u32,
    standard_id: Option<i64>,
    #[serde(default)]
    mappings: Vec<RawMapping>,
}

/// One raw entry. `control_id` stays optional here so a missing id can
/// be reported as a malformed record rather than a parse failure.
#[derive(Debug, Deserialize)]
struct RawMapping {
    control_id: Option<i64>,
    #[serde(default)]
    selection_parameters: Option<String>,
    #[serde(default)]
    guidance: Option<String>,
}

/// Loads every `*.json` document under a directory.
pub struct DocumentSource {
    dir: PathBuf,
}

impl DocumentSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn document_paths(&self) -> Result<Vec<PathBuf>, SourceError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| SourceError::Io {
            path: self.dir.display().to_string(),
            message: e.to_string(),
        })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == SOURCE_DOCUMENT_EXT)
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();
        Ok(paths)
    }
}

impl MappingSource for DocumentSource {
    fn load(&self) -> Result<LoadBatch, SourceError> {
        let mut standards = Vec::new();
        let mut seen = FxHashSet::default();
        let mut records = Vec::new();

        for path in self.document_paths()? {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let content = std::fs::read_to_string(&path).map_err(|e| SourceError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            let (standard_id, mut doc_records) = parse_document(&name, &content)?;
            if seen.insert(standard_id) {
                standards.push(standard_id);
            }
            records.append(&mut doc_records);
        }

        Ok(LoadBatch {
            format_version: SUPPORTED_SOURCE_FORMAT,
            standards,
            records,
        })
    }

    fn describe(&self) -> String {
        format!("documents:{}", self.dir.display())
    }
}

/// Parse one document, enforcing the format version and record shape.
fn parse_document(name: &str, content: &str) -> Result<(i64, Vec<MappingRecord>), SourceError> {
    let doc: MappingDocument =
        serde_json::from_str(content).map_err(|e| SourceError::Parse {
            document: name.to_string(),
            message: e.to_string(),
        })?;

    if doc.format_version != SUPPORTED_SOURCE_FORMAT {
        return Err(SourceError::VersionMismatch {
            document: name.to_string(),
            found: doc.format_version,
            expected: SUPPORTED_SOURCE_FORMAT,
        });
    }

    let standard_id = doc.standard_id.ok_or_else(|| SourceError::MalformedRecord {
        document: name.to_string(),
        reason: "document is missing standard_id".to_string(),
    })?;

    let mut records = Vec::with_capacity(doc.mappings.len());
    for (idx, raw) in doc.mappings.into_iter().enumerate() {
        let control_id = raw.control_id.ok_or_else(|| SourceError::MalformedRecord {
            document: name.to_string(),
            reason: format!("mapping {idx} is missing control_id"),
        })?;
        records.push(MappingRecord {
            standard_id,
            control_id,
            selection_parameters: raw.selection_parameters,
            guidance: raw.guidance,
        });
    }
    Ok((standard_id, records))
}

/// In-memory source for tests and embedding callers. The affected
/// standard set is derived from the records (first-appearance order);
/// standards that should be reconciled to empty are added explicitly.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    standards: Vec<i64>,
    records: Vec<MappingRecord>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, records: Vec<MappingRecord>) -> Self {
        let mut standards = Vec::new();
        let mut seen = FxHashSet::default();
        for record in &records {
            if seen.insert(record.standard_id) {
                standards.push(record.standard_id);
            }
        }
        Self {
            name: name.into(),
            standards,
            records,
        }
    }

    /// Declare a standard with no records, authorizing full removal of
    /// its persisted rows.
    pub fn with_empty_standard(mut self, standard_id: i64) -> Self {
        if !self.standards.contains(&standard_id) {
            self.standards.push(standard_id);
        }
        self
    }
}

impl MappingSource for StaticSource {
    fn load(&self) -> Result<LoadBatch, SourceError> {
        Ok(LoadBatch {
            format_version: SUPPORTED_SOURCE_FORMAT,
            standards: self.standards.clone(),
            records: self.records.clone(),
        })
    }

    fn describe(&self) -> String {
        format!("static:{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_unsupported_version() {
        let err = parse_document(
            "s8.json",
            r#"{"format_version": 2, "standard_id": 8, "mappings": []}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SourceError::VersionMismatch { found: 2, expected: 1, .. }
        ));
    }

    #[test]
    fn parse_rejects_missing_control_id() {
        let err = parse_document(
            "s8.json",
            r#"{"format_version": 1, "standard_id": 8, "mappings": [{"guidance": "x"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::MalformedRecord { .. }));
    }

    #[test]
    fn parse_rejects_missing_standard_id() {
        let err =
            parse_document("s8.json", r#"{"format_version": 1, "mappings": []}"#).unwrap_err();
        assert!(matches!(err, SourceError::MalformedRecord { .. }));
    }

    #[test]
    fn static_source_derives_standards_in_order() {
        let source = StaticSource::new(
            "t",
            vec![
                MappingRecord {
                    standard_id: 6,
                    control_id: 1,
                    selection_parameters: None,
                    guidance: None,
                },
                MappingRecord {
                    standard_id: 8,
                    control_id: 1,
                    selection_parameters: None,
                    guidance: None,
                },
                MappingRecord {
                    standard_id: 6,
                    control_id: 2,
                    selection_parameters: None,
                    guidance: None,
                },
            ],
        )
        .with_empty_standard(9);
        let batch = source.load().unwrap();
        assert_eq!(batch.standards, vec![6, 8, 9]);
        assert_eq!(batch.records.len(), 3);
    }
}
