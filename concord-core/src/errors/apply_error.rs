//! Apply-phase errors. Any of these means the transaction rolled back
//! and the table is in its pre-run state.

use super::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error(
        "constraint violation applying (standard {standard_id}, control {control_id}): {message}"
    )]
    ConstraintViolation {
        standard_id: i64,
        control_id: i64,
        message: String,
    },

    #[error("transaction aborted: {reason}")]
    TransactionAborted { reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
