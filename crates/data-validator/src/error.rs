//! Validation Error Types

use thiserror::Error;

/// Errors raised while validating or transforming an input record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Numeric field set does not match the fitted schema
    #[error("Schema mismatch: missing fields {missing:?}, unexpected fields {unexpected:?}")]
    SchemaMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// Categorical value outside its closed vocabulary
    #[error("Unknown category for {field}: {value:?}")]
    UnknownCategory { field: String, value: String },

    /// Field present with the wrong value type
    #[error("Field {field} must be {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    /// NaN or infinite numeric input
    #[error("Field {field} is not a finite number")]
    NonFinite { field: String },

    /// Vector width does not match the fitted transform
    #[error("Width mismatch: expected {expected} values, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    /// Value out of its plausible range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl ValidationError {
    /// Whether the error describes a record whose shape is wrong, as opposed
    /// to a record with bad values
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            ValidationError::SchemaMismatch { .. } | ValidationError::WidthMismatch { .. }
        )
    }
}
