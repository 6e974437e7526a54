//! Inference Engine Implementation

use crate::artifact::ModelArtifact;
use crate::model::Regressor;
use crate::InferenceError;
use feature_engine::{FeatureAssembler, FeatureSchema, FeatureVector, RawRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Burned-area prediction for one observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted burned area (hectares)
    pub burned_area: f64,
    /// Input fields outside their plausible range (advisory)
    pub range_warnings: Vec<String>,
    /// Timestamp when prediction was made
    pub timestamp_ms: u64,
}

/// Result of inference operation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The prediction
    pub prediction: Prediction,
    /// Assembly + prediction latency in microseconds
    pub latency_us: u64,
}

/// Prediction context built once at startup.
///
/// Immutable after construction; share it behind an `Arc` between callers.
pub struct InferenceEngine {
    /// Feature assembler bound to the fitted scaler
    assembler: FeatureAssembler,
    /// Fitted regressor
    model: Box<dyn Regressor>,
    /// Where the artifact came from
    model_path: String,
}

impl InferenceEngine {
    /// Create an engine from an assembler and a model of matching width
    pub fn new(assembler: FeatureAssembler, model: Box<dyn Regressor>) -> Result<Self, InferenceError> {
        if model.num_features() != assembler.width() {
            return Err(InferenceError::InvalidInputShape {
                expected: assembler.width(),
                actual: model.num_features(),
            });
        }

        Ok(Self {
            assembler,
            model,
            model_path: "memory".to_string(),
        })
    }

    /// Load an artifact file; any failure here is fatal for serving
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let artifact = ModelArtifact::load(path)?;
        let mut engine = Self::from_artifact(artifact)?;
        engine.model_path = path.display().to_string();
        Ok(engine)
    }

    /// Build an engine from an already parsed artifact
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, InferenceError> {
        artifact.validate()?;

        let ModelArtifact {
            schema,
            scaler,
            model,
            ..
        } = artifact;

        let assembler = FeatureAssembler::new(schema, Box::new(scaler))?;
        let engine = Self::new(assembler, model.into_regressor())
            .map_err(|e| InferenceError::ArtifactLoad(e.to_string()))?;

        info!(
            "Inference engine ready: schema v{}, {} features",
            engine.schema().version,
            engine.assembler.width()
        );
        Ok(engine)
    }

    /// Build the model-ready feature vector for a record
    pub fn assemble(&self, record: &RawRecord) -> Result<FeatureVector, InferenceError> {
        self.assembler.assemble(record).map_err(|e| {
            warn!("Rejected record: {}", e);
            InferenceError::from(e)
        })
    }

    /// Run the model on an assembled vector
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        if features.columns() != self.assembler.columns() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.assembler.width(),
                actual: features.width(),
            });
        }

        let value = self.model.predict(features.values())?;
        if !value.is_finite() {
            return Err(InferenceError::PredictionFailed(format!(
                "model produced non-finite output {}",
                value
            )));
        }
        Ok(value)
    }

    /// Assemble, check ranges and predict in one call
    pub fn predict_record(&self, record: &RawRecord) -> Result<InferenceResult, InferenceError> {
        let start = std::time::Instant::now();

        let features = self.assemble(record)?;

        let ranges = self.assembler.check_ranges(record);
        let range_warnings: Vec<String> = ranges.errors.iter().map(|e| e.to_string()).collect();
        for warning in &range_warnings {
            warn!("Out-of-range input: {}", warning);
        }

        let burned_area = self.predict(&features)?;

        let latency_us = start.elapsed().as_micros() as u64;
        debug!("Predicted burned area {:.4} in {}us", burned_area, latency_us);

        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Ok(InferenceResult {
            prediction: Prediction {
                burned_area,
                range_warnings,
                timestamp_ms,
            },
            latency_us,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.assembler.schema()
    }

    /// Column names in model order
    pub fn columns(&self) -> &[String] {
        self.assembler.columns()
    }

    /// Get model path
    pub fn model_path(&self) -> &str {
        &self.model_path
    }
}
