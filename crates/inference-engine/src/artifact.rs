//! Model Artifact Loading

use crate::model::{ModelSpec, Regressor};
use crate::InferenceError;
use data_validator::{Scaler, StandardScaler};
use feature_engine::FeatureSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Artifact layout version understood by this build
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Everything needed to serve predictions: the column layout, the fitted
/// scaler and the fitted model, persisted together as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub schema: FeatureSchema,
    pub scaler: StandardScaler,
    pub model: ModelSpec,
}

impl ModelArtifact {
    /// Read and validate an artifact file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        info!("Loading model artifact from {}", path.display());

        let contents = std::fs::read_to_string(path).map_err(|e| {
            InferenceError::ArtifactLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate an artifact from its JSON text
    pub fn from_json(json: &str) -> Result<Self, InferenceError> {
        let artifact: ModelArtifact = serde_json::from_str(json)
            .map_err(|e| InferenceError::ArtifactLoad(format!("malformed artifact: {}", e)))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check the three parts agree on the feature layout
    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(InferenceError::ArtifactLoad(format!(
                "unsupported artifact format {}, expected {}",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }

        self.schema.validate()?;

        if self.scaler.width() != self.schema.numeric_width() {
            return Err(InferenceError::ArtifactLoad(format!(
                "scaler fitted on {} columns, schema declares {} numeric columns",
                self.scaler.width(),
                self.schema.numeric_width()
            )));
        }

        let model_width = match &self.model {
            ModelSpec::GradientBoosting(m) => m.num_features(),
        };
        if model_width != self.schema.width() {
            return Err(InferenceError::ArtifactLoad(format!(
                "model expects {} features, schema produces {}",
                model_width,
                self.schema.width()
            )));
        }

        debug!(
            "Artifact validated: schema v{}, {} columns",
            self.schema.version,
            self.schema.width()
        );
        Ok(())
    }
}
