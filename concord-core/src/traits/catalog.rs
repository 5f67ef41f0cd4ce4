//! The parent-catalog seam.
//!
//! The standards and controls catalogs are read-only collaborators. The
//! validator works from an immutable id snapshot so the referential pass
//! can run in parallel without holding a connection.

use rustc_hash::FxHashSet;

use crate::errors::StorageError;

/// Immutable snapshot of the parent catalog id spaces.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub standards: FxHashSet<i64>,
    pub controls: FxHashSet<i64>,
}

impl CatalogSnapshot {
    pub fn has_standard(&self, id: i64) -> bool {
        self.standards.contains(&id)
    }

    pub fn has_control(&self, id: i64) -> bool {
        self.controls.contains(&id)
    }
}

/// Anything that can produce a catalog snapshot.
pub trait CatalogSource {
    fn snapshot(&self) -> Result<CatalogSnapshot, StorageError>;
}
