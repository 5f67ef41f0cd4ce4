//! Validation rule violations.

/// A single structural rule violation found in an incoming batch.
/// Every variant carries the identifying keys of the offending record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "duplicate key (standard {standard_id}, control {control_id}): record {dup_index} repeats record {first_index}"
    )]
    DuplicateKey {
        standard_id: i64,
        control_id: i64,
        first_index: usize,
        dup_index: usize,
    },

    #[error("standard {standard_id} does not exist in the standards catalog")]
    UnknownStandard { standard_id: i64 },

    #[error("control {control_id} (standard {standard_id}) does not exist in the controls catalog")]
    UnknownControl { standard_id: i64, control_id: i64 },

    #[error(
        "{field} for (standard {standard_id}, control {control_id}) is {len} bytes, max {max}"
    )]
    TextTooLong {
        field: &'static str,
        standard_id: i64,
        control_id: i64,
        len: usize,
        max: usize,
    },

    #[error("{field} for (standard {standard_id}, control {control_id}) contains control characters")]
    InvalidText {
        field: &'static str,
        standard_id: i64,
        control_id: i64,
    },
}

/// Aggregate failure returned when a batch violates one or more rules.
/// The pipeline must not proceed past validation when this is raised;
/// no database state has been touched yet.
#[derive(Debug, thiserror::Error)]
#[error("validation failed with {} violation(s)", .violations.len())]
pub struct ValidationFailure {
    pub violations: Vec<ValidationError>,
}
