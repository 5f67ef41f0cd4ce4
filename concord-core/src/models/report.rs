//! Apply summary for audit logging.

use serde::Serialize;

/// Counts of what one reconciliation run did to the mapping table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub inserted: u64,
    pub updated: u64,
    pub deleted: u64,
    pub unchanged: u64,
    pub duration_ms: u64,
}

impl ApplyReport {
    /// Total rows touched by effective operations.
    pub fn total_changed(&self) -> u64 {
        self.inserted + self.updated + self.deleted
    }
}
