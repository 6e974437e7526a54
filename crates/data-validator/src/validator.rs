//! Record Validator for Field-Set and Range Checking

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Plausible value ranges for the wildfire observation fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Spatial grid x coordinate
    pub x_range: (f64, f64),
    /// Spatial grid y coordinate
    pub y_range: (f64, f64),
    /// Fine Fuel Moisture Code
    pub ffmc_range: (f64, f64),
    /// Duff Moisture Code
    pub dmc_range: (f64, f64),
    /// Drought Code
    pub dc_range: (f64, f64),
    /// Initial Spread Index
    pub isi_range: (f64, f64),
    /// Temperature (°C)
    pub temp_range: (f64, f64),
    /// Relative humidity (%)
    pub rh_range: (f64, f64),
    /// Wind speed (km/h)
    pub wind_range: (f64, f64),
    /// Rain (mm/m²)
    pub rain_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            x_range: (1.0, 9.0),
            y_range: (1.0, 9.0),
            ffmc_range: (0.0, 101.0),
            dmc_range: (0.0, f64::MAX),
            dc_range: (0.0, f64::MAX),
            isi_range: (0.0, f64::MAX),
            temp_range: (-40.0, 60.0),
            rh_range: (0.0, 100.0),
            wind_range: (0.0, f64::MAX),
            rain_range: (0.0, f64::MAX),
        }
    }
}

impl ValidationConfig {
    /// Range configured for a field, if the field is known
    pub fn range_for(&self, field: &str) -> Option<(f64, f64)> {
        match field {
            "X" => Some(self.x_range),
            "Y" => Some(self.y_range),
            "FFMC" => Some(self.ffmc_range),
            "DMC" => Some(self.dmc_range),
            "DC" => Some(self.dc_range),
            "ISI" => Some(self.isi_range),
            "temp" => Some(self.temp_range),
            "RH" => Some(self.rh_range),
            "wind" => Some(self.wind_range),
            "rain" => Some(self.rain_range),
            _ => None,
        }
    }
}

/// Result of advisory range validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are in range
    pub valid: bool,
    /// Out-of-range findings
    pub errors: Vec<ValidationError>,
    /// Number of fields that had a configured range
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }
}

/// Outcome of comparing a record's numeric field names against a schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCheck {
    /// Expected fields absent from the record
    pub missing: Vec<String>,
    /// Record fields the schema does not know
    pub unexpected: Vec<String>,
}

impl FieldCheck {
    /// True when the field sets match exactly
    pub fn is_exact(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }

    /// Convert to a schema error when the sets differ
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_exact() {
            Ok(())
        } else {
            Err(ValidationError::SchemaMismatch {
                missing: self.missing,
                unexpected: self.unexpected,
            })
        }
    }
}

/// Validator for wildfire observation records
pub struct RecordValidator {
    config: ValidationConfig,
}

impl RecordValidator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Compare present field names against the expected ones.
    ///
    /// `missing` keeps the order of `expected`; `unexpected` is sorted.
    pub fn check_fields<'a, P, E>(&self, present: P, expected: E) -> FieldCheck
    where
        P: IntoIterator<Item = &'a str>,
        E: IntoIterator<Item = &'a str>,
    {
        let present: BTreeSet<&str> = present.into_iter().collect();
        let expected: Vec<&str> = expected.into_iter().collect();
        let expected_set: BTreeSet<&str> = expected.iter().copied().collect();

        let missing = expected
            .iter()
            .filter(|name| !present.contains(*name))
            .map(|name| name.to_string())
            .collect();
        let unexpected = present
            .difference(&expected_set)
            .map(|name| name.to_string())
            .collect();

        FieldCheck {
            missing,
            unexpected,
        }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Check every named value that has a configured range
    pub fn check_ranges<'a, I>(&self, values: I) -> ValidationResult
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut errors = Vec::new();
        let mut checked = 0;

        for (field, value) in values {
            let Some(range) = self.config.range_for(field) else {
                continue;
            };
            checked += 1;
            if let Err(e) = self.validate_range(field, value, range) {
                errors.push(e);
            }
        }

        debug!("Range check: {} fields, {} out of range", checked, errors.len());

        if errors.is_empty() {
            ValidationResult::valid(checked)
        } else {
            ValidationResult::invalid(errors, checked)
        }
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: [&str; 3] = ["X", "wind", "rain"];

    #[test]
    fn test_exact_field_set() {
        let validator = RecordValidator::default();
        let check = validator.check_fields(["rain", "X", "wind"], EXPECTED);
        assert!(check.is_exact());
        assert!(check.into_result().is_ok());
    }

    #[test]
    fn test_missing_and_unexpected_fields() {
        let validator = RecordValidator::default();
        let check = validator.check_fields(["X", "rain", "snow"], EXPECTED);
        assert_eq!(check.missing, vec!["wind".to_string()]);
        assert_eq!(check.unexpected, vec!["snow".to_string()]);

        match check.into_result() {
            Err(ValidationError::SchemaMismatch { missing, .. }) => {
                assert_eq!(missing, vec!["wind".to_string()])
            }
            other => panic!("expected schema mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_humidity_range() {
        let validator = RecordValidator::default();
        let result = validator.check_ranges([("RH", 51.0), ("temp", 8.2)]);
        assert!(result.valid);
        assert_eq!(result.fields_checked, 2);

        let result = validator.check_ranges([("RH", 140.0), ("rain", -1.0)]);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_unknown_fields_are_not_range_checked() {
        let validator = RecordValidator::default();
        let result = validator.check_ranges([("area", -5.0)]);
        assert!(result.valid);
        assert_eq!(result.fields_checked, 0);
    }
}
