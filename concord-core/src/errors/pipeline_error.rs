//! Pipeline errors — aggregates subsystem errors via `From` conversions.

use super::{ApplyError, SourceError, StorageError, ValidationFailure};

/// Errors that can abort a reconciliation run.
/// Any of these is a terminal `Aborted` state for the run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationFailure),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Apply error: {0}")]
    Apply(#[from] ApplyError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
