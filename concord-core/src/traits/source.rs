//! The canonical-source seam.

use crate::errors::SourceError;
use crate::models::LoadBatch;

/// A canonical source of mapping records.
///
/// Implementations must be restartable: `load()` on the same source
/// version yields the same batch, records in the same order.
pub trait MappingSource {
    fn load(&self) -> Result<LoadBatch, SourceError>;

    /// Human-readable description for run logs and the load history.
    fn describe(&self) -> String;
}
