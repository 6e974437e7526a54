//! Feature Vector Assembly

use crate::record::{FieldValue, RawRecord};
use crate::schema::{FeatureSchema, SchemaError, DAY_FIELD, MONTH_FIELD};
use crate::vocabulary::{encode_categorical, CategoryVector};
use data_validator::{RecordValidator, Scaler, ValidationError, ValidationResult};
use std::sync::Arc;
use tracing::debug;

/// Standardized numeric columns, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledVector {
    values: Vec<f64>,
}

impl ScaledVector {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Model-ready feature row: scaled numeric columns, then category flags
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
    columns: Arc<[String]>,
}

impl FeatureVector {
    /// Build from raw values and the column names they line up with
    pub fn new(values: Vec<f64>, columns: Arc<[String]>) -> Result<Self, ValidationError> {
        if values.len() != columns.len() {
            return Err(ValidationError::WidthMismatch {
                expected: columns.len(),
                actual: values.len(),
            });
        }
        Ok(Self { values, columns })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }

    /// Value of a named column
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }
}

/// Extract the schema's numeric fields from `record` in fitted order and
/// standardize them.
///
/// The record's non-categorical field set must equal the schema's numeric
/// columns exactly; anything else is a [`ValidationError::SchemaMismatch`].
pub fn scale_numeric(
    record: &RawRecord,
    schema: &FeatureSchema,
    scaler: &dyn Scaler,
) -> Result<ScaledVector, ValidationError> {
    let present = record
        .field_names()
        .filter(|name| *name != MONTH_FIELD && *name != DAY_FIELD);
    RecordValidator::default()
        .check_fields(present, schema.numeric_columns.iter().map(String::as_str))
        .into_result()?;

    let mut raw = Vec::with_capacity(schema.numeric_width());
    for column in &schema.numeric_columns {
        match record.get(column) {
            Some(FieldValue::Number(v)) if v.is_finite() => raw.push(*v),
            Some(FieldValue::Number(_)) => {
                return Err(ValidationError::NonFinite {
                    field: column.clone(),
                })
            }
            _ => {
                return Err(ValidationError::InvalidType {
                    field: column.clone(),
                    expected: "a number",
                })
            }
        }
    }

    let values = scaler.transform(&raw)?;
    Ok(ScaledVector { values })
}

/// Builds feature vectors against one fitted scaler and schema.
///
/// Holds no per-request state; every call produces fresh vectors.
pub struct FeatureAssembler {
    schema: FeatureSchema,
    columns: Arc<[String]>,
    scaler: Box<dyn Scaler>,
    validator: RecordValidator,
}

impl FeatureAssembler {
    /// Create an assembler, checking the scaler was fitted on the schema's
    /// numeric columns
    pub fn new(schema: FeatureSchema, scaler: Box<dyn Scaler>) -> Result<Self, SchemaError> {
        schema.validate()?;
        if scaler.width() != schema.numeric_width() {
            return Err(SchemaError::ScalerWidth {
                expected: schema.numeric_width(),
                actual: scaler.width(),
            });
        }

        let columns: Arc<[String]> = schema.columns().into();
        Ok(Self {
            schema,
            columns,
            scaler,
            validator: RecordValidator::default(),
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Column names in model order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn scale_numeric(&self, record: &RawRecord) -> Result<ScaledVector, ValidationError> {
        scale_numeric(record, &self.schema, self.scaler.as_ref())
    }

    pub fn encode_categorical(&self, record: &RawRecord) -> Result<CategoryVector, ValidationError> {
        encode_categorical(record)
    }

    /// Scale, encode and concatenate into the model's column order
    pub fn assemble(&self, record: &RawRecord) -> Result<FeatureVector, ValidationError> {
        let scaled = self.scale_numeric(record)?;
        let categories = self.encode_categorical(record)?;

        let mut values = Vec::with_capacity(self.width());
        values.extend_from_slice(scaled.values());
        values.extend_from_slice(categories.values());

        debug!(
            "Assembled feature vector: {} numeric + {} categorical",
            scaled.len(),
            categories.values().len()
        );

        FeatureVector::new(values, Arc::clone(&self.columns))
    }

    /// Advisory range check of the record's numeric fields
    pub fn check_ranges(&self, record: &RawRecord) -> ValidationResult {
        let values = self.schema.numeric_columns.iter().filter_map(|c| {
            record
                .get(c)
                .and_then(FieldValue::as_number)
                .map(|v| (c.as_str(), v))
        });
        self.validator.check_ranges(values)
    }
}
