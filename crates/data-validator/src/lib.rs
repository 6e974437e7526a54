//! Data Validation and Standardization
//!
//! Provides numeric field-set checks, advisory range checking, and the fitted
//! standard scaler applied to wildfire observations before inference.

mod error;
mod normalizer;
mod validator;

pub use error::ValidationError;
pub use normalizer::{Scaler, StandardScaler};
pub use validator::{FieldCheck, RecordValidator, ValidationConfig, ValidationResult};
