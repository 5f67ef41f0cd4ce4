//! Error handling for Concord.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod apply_error;
pub mod config_error;
pub mod pipeline_error;
pub mod source_error;
pub mod storage_error;
pub mod validation_error;

pub use apply_error::ApplyError;
pub use config_error::ConfigError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use source_error::SourceError;
pub use storage_error::StorageError;
pub use validation_error::{ValidationError, ValidationFailure};
