//! Feature Engineering Engine
//!
//! Turns a raw wildfire observation into the fixed-width, fixed-order feature
//! vector the trained regressor was fitted on: standardized numeric columns
//! first, then one-hot month and day columns.

mod features;
mod record;
mod schema;
mod vocabulary;

pub use data_validator::ValidationError;
pub use features::{scale_numeric, FeatureAssembler, FeatureVector, ScaledVector};
pub use record::{FieldValue, RawRecord};
pub use schema::{FeatureSchema, SchemaError, DAY_FIELD, MONTH_FIELD, SCHEMA_VERSION};
pub use vocabulary::{
    build_category_template, encode_categorical, CategoryVector, Day, Month,
    CATEGORY_COLUMNS, CATEGORY_WIDTH,
};
