//! Burned-Area Inference Engine
//!
//! Loads a fitted scaler and tree-ensemble regressor from a JSON artifact and
//! evaluates them on assembled feature vectors.

mod artifact;
mod engine;
mod model;

pub use artifact::{ModelArtifact, ARTIFACT_FORMAT_VERSION};
pub use engine::{InferenceEngine, InferenceResult, Prediction};
pub use model::{GradientBoostedRegressor, ModelSpec, RegressionTree, Regressor, TargetTransform, TreeNode};

use data_validator::ValidationError;
use feature_engine::SchemaError;
use thiserror::Error;

/// Errors during artifact loading or inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Artifact load failed: {0}")]
    ArtifactLoad(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),
}

impl From<SchemaError> for InferenceError {
    fn from(err: SchemaError) -> Self {
        InferenceError::ArtifactLoad(err.to_string())
    }
}
