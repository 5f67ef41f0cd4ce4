//! Data models for the reconciliation pipeline.

pub mod batch;
pub mod mapping;
pub mod plan;
pub mod report;
pub mod run_state;

pub use batch::{DuplicateWarning, LoadBatch, ValidatedBatch};
pub use mapping::{MappingKey, MappingRecord, MappingRow};
pub use plan::{Plan, PlanAction};
pub use report::ApplyReport;
pub use run_state::RunState;
