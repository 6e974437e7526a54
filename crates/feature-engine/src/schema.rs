//! Versioned Column-Order Descriptor

use crate::vocabulary::{CATEGORY_COLUMNS, CATEGORY_WIDTH};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Layout version understood by this build
pub const SCHEMA_VERSION: u32 = 1;

/// Categorical field holding the month abbreviation
pub const MONTH_FIELD: &str = "month";

/// Categorical field holding the day-of-week abbreviation
pub const DAY_FIELD: &str = "day";

/// Numeric columns of the reference fire dataset, in fitted order
const FOREST_FIRE_NUMERIC: [&str; 10] = [
    "X", "Y", "FFMC", "DMC", "DC", "ISI", "temp", "RH", "wind", "rain",
];

/// Errors in a schema descriptor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("Unsupported schema version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Schema declares no numeric columns")]
    Empty,
    #[error("Duplicate numeric column: {0}")]
    DuplicateColumn(String),
    #[error("Column name {0} is reserved for categorical fields")]
    ReservedColumn(String),
    #[error("Scaler fitted on {actual} columns, schema declares {expected}")]
    ScalerWidth { expected: usize, actual: usize },
}

/// Explicit feature layout shipped with a model: the numeric columns in the
/// order the scaler and model were fitted on. The 19 category columns always
/// follow them in [`CATEGORY_COLUMNS`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub numeric_columns: Vec<String>,
}

impl FeatureSchema {
    /// Layout of the Montesinho park fire dataset (10 numeric columns)
    pub fn forest_fires() -> Self {
        Self {
            version: SCHEMA_VERSION,
            numeric_columns: FOREST_FIRE_NUMERIC.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.version != SCHEMA_VERSION {
            return Err(SchemaError::UnsupportedVersion {
                found: self.version,
                expected: SCHEMA_VERSION,
            });
        }
        if self.numeric_columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::new();
        for column in &self.numeric_columns {
            if column == MONTH_FIELD
                || column == DAY_FIELD
                || CATEGORY_COLUMNS.contains(&column.as_str())
            {
                return Err(SchemaError::ReservedColumn(column.clone()));
            }
            if !seen.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }
        Ok(())
    }

    pub fn numeric_width(&self) -> usize {
        self.numeric_columns.len()
    }

    /// Total feature vector width
    pub fn width(&self) -> usize {
        self.numeric_width() + CATEGORY_WIDTH
    }

    /// Every column name in model order
    pub fn columns(&self) -> Vec<String> {
        self.numeric_columns
            .iter()
            .cloned()
            .chain(CATEGORY_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::forest_fires()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forest_fire_layout() {
        let schema = FeatureSchema::forest_fires();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.width(), 29);

        let columns = schema.columns();
        assert_eq!(columns[0], "X");
        assert_eq!(columns[9], "rain");
        assert_eq!(columns[10], "month_jan");
        assert_eq!(columns[21], "month_dec");
        assert_eq!(columns[22], "day_mon");
        assert_eq!(columns[28], "day_sun");
    }

    #[test]
    fn test_rejects_bad_descriptors() {
        let mut schema = FeatureSchema::forest_fires();
        schema.version = 2;
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::UnsupportedVersion { found: 2, .. })
        ));

        let mut schema = FeatureSchema::forest_fires();
        schema.numeric_columns.push("temp".to_string());
        assert_eq!(
            schema.validate(),
            Err(SchemaError::DuplicateColumn("temp".to_string()))
        );

        let mut schema = FeatureSchema::forest_fires();
        schema.numeric_columns.push("month".to_string());
        assert!(matches!(schema.validate(), Err(SchemaError::ReservedColumn(_))));

        let schema = FeatureSchema {
            version: SCHEMA_VERSION,
            numeric_columns: vec![],
        };
        assert_eq!(schema.validate(), Err(SchemaError::Empty));
    }

    #[test]
    fn test_deserialize_descriptor() {
        let schema: FeatureSchema =
            serde_json::from_str(r#"{"version":1,"numeric_columns":["temp","RH"]}"#).unwrap();
        assert_eq!(schema.width(), 21);
    }
}
