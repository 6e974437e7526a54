//! Fitted Z-score Standardization

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// A fitted numeric transform applied column-wise to a single row.
///
/// Implementations are read-only after construction so they can be shared
/// between concurrent callers.
pub trait Scaler: Send + Sync {
    /// Number of columns the transform was fitted on
    fn width(&self) -> usize;

    /// Transform one row, preserving column order
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ValidationError>;
}

/// Standard scaler with parameters fitted at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScalerParams", into = "ScalerParams")]
pub struct StandardScaler {
    /// Per-column mean
    mean: Vec<f64>,
    /// Per-column standard deviation (zeros replaced by 1)
    scale: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct ScalerParams {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Create a scaler from fitted means and standard deviations
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ValidationError> {
        if mean.len() != scale.len() {
            return Err(ValidationError::WidthMismatch {
                expected: mean.len(),
                actual: scale.len(),
            });
        }
        if let Some(i) = mean
            .iter()
            .chain(scale.iter())
            .position(|v| !v.is_finite())
        {
            return Err(ValidationError::NonFinite {
                field: format!("scaler parameter {}", i % mean.len().max(1)),
            });
        }

        if let Some(i) = scale.iter().position(|s| *s < 0.0) {
            return Err(ValidationError::OutOfRange {
                field: format!("scaler scale[{}]", i),
                value: scale[i],
                min: 0.0,
                max: f64::MAX,
            });
        }

        // Constant features were fitted with zero variance; leave them unscaled.
        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        Ok(Self { mean, scale })
    }

    /// Fitted means
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Fitted standard deviations
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

impl Scaler for StandardScaler {
    fn width(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ValidationError> {
        if row.len() != self.width() {
            return Err(ValidationError::WidthMismatch {
                expected: self.width(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}

impl TryFrom<ScalerParams> for StandardScaler {
    type Error = ValidationError;

    fn try_from(params: ScalerParams) -> Result<Self, Self::Error> {
        StandardScaler::new(params.mean, params.scale)
    }
}

impl From<StandardScaler> for ScalerParams {
    fn from(scaler: StandardScaler) -> Self {
        Self {
            mean: scaler.mean,
            scale: scaler.scale,
        }
    }
}
