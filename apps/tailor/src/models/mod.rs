// Structured profile types passed between pipeline stages.
// Every type here is produced once and never mutated afterwards; later stages build fresh values.

pub mod dates;
pub mod job;
pub mod plan;
pub mod report;
pub mod resume;

use thiserror::Error;

pub use job::JobProfile;
pub use plan::TailoringPlan;
pub use report::{MatchResult, OutputReport};
pub use resume::ResumeProfile;

/// A structurally parsed value that breaks one of its schema invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("{field} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} must not be empty")]
    Empty { field: String },

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
}

/// Schema invariants that serde alone cannot express.
///
/// Agent output is deserialized first and then validated; a value that fails here is
/// rejected rather than clamped or patched.
pub trait Validate {
    fn validate(&self) -> Result<(), SchemaError>;
}

pub(crate) fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), SchemaError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SchemaError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}

pub(crate) fn check_non_empty(field: &str, value: &str) -> Result<(), SchemaError> {
    if value.trim().is_empty() {
        Err(SchemaError::Empty {
            field: field.to_string(),
        })
    } else {
        Ok(())
    }
}
