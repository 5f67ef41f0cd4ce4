//! # concord-core
//!
//! Foundation crate for the Concord reconciliation pipeline.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod time;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{ReconcileConfig, ReconcileScope};
pub use errors::{PipelineError, PipelineResult};
pub use models::{
    ApplyReport, LoadBatch, MappingKey, MappingRecord, MappingRow, Plan, PlanAction, RunState,
    ValidatedBatch,
};
