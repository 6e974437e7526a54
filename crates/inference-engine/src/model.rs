//! Tree Ensemble Regressor

use crate::InferenceError;
use serde::{Deserialize, Serialize};

/// A fitted model producing one scalar per feature row
pub trait Regressor: Send + Sync {
    /// Width of the feature rows the model was fitted on
    fn num_features(&self) -> usize;

    /// Predict for a single row
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError>;
}

/// Transform applied to the ensemble output to recover the target's units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTransform {
    /// Model was fitted on the raw target
    #[default]
    Identity,
    /// Model was fitted on `ln(1 + y)`
    Log1p,
}

impl TargetTransform {
    pub fn apply(&self, raw: f64) -> f64 {
        match self {
            TargetTransform::Identity => raw,
            TargetTransform::Log1p => raw.exp_m1(),
        }
    }
}

/// Node of a binary regression tree. Splits send a row left when
/// `features[feature] <= threshold`, with the feature first rounded to `f32`
/// since fitted thresholds come from single-precision training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Flattened regression tree; node 0 is the root
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Build a tree, checking every child index points forward and in bounds
    /// so evaluation always reaches a leaf.
    pub fn new(nodes: Vec<TreeNode>, num_features: usize) -> Result<Self, String> {
        if nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (i, node) in nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= num_features {
                        return Err(format!(
                            "node {} splits on feature {} of {}",
                            i, feature, num_features
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", i));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= nodes.len() {
                            return Err(format!("node {} has invalid child {}", i, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} is not finite", i));
                    }
                }
            }
        }

        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Leaf value reached by `features`; callers check the row width
    pub(crate) fn evaluate(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if f64::from(features[*feature] as f32) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Additive ensemble of regression trees:
/// `target(init + learning_rate * Σ tree(x))`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnsembleParams", into = "EnsembleParams")]
pub struct GradientBoostedRegressor {
    init: f64,
    learning_rate: f64,
    num_features: usize,
    target: TargetTransform,
    trees: Vec<RegressionTree>,
}

#[derive(Serialize, Deserialize)]
struct EnsembleParams {
    init: f64,
    learning_rate: f64,
    num_features: usize,
    #[serde(default)]
    target: TargetTransform,
    trees: Vec<Vec<TreeNode>>,
}

impl GradientBoostedRegressor {
    pub fn new(
        init: f64,
        learning_rate: f64,
        num_features: usize,
        target: TargetTransform,
        trees: Vec<Vec<TreeNode>>,
    ) -> Result<Self, String> {
        if !init.is_finite() || !learning_rate.is_finite() {
            return Err("init and learning_rate must be finite".to_string());
        }

        let trees = trees
            .into_iter()
            .enumerate()
            .map(|(i, nodes)| {
                RegressionTree::new(nodes, num_features).map_err(|e| format!("tree {}: {}", i, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            init,
            learning_rate,
            num_features,
            target,
            trees,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn target(&self) -> TargetTransform {
        self.target
    }

    /// Ensemble output before the target transform
    pub fn raw_score(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.num_features {
            return Err(InferenceError::InvalidInputShape {
                expected: self.num_features,
                actual: features.len(),
            });
        }
        let boost: f64 = self.trees.iter().map(|t| t.evaluate(features)).sum();
        Ok(self.init + self.learning_rate * boost)
    }
}

impl Regressor for GradientBoostedRegressor {
    fn num_features(&self) -> usize {
        self.num_features
    }

    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        Ok(self.target.apply(self.raw_score(features)?))
    }
}

impl TryFrom<EnsembleParams> for GradientBoostedRegressor {
    type Error = String;

    fn try_from(p: EnsembleParams) -> Result<Self, Self::Error> {
        GradientBoostedRegressor::new(p.init, p.learning_rate, p.num_features, p.target, p.trees)
    }
}

impl From<GradientBoostedRegressor> for EnsembleParams {
    fn from(m: GradientBoostedRegressor) -> Self {
        Self {
            init: m.init,
            learning_rate: m.learning_rate,
            num_features: m.num_features,
            target: m.target,
            trees: m.trees.into_iter().map(|t| t.nodes).collect(),
        }
    }
}

/// Model section of an artifact, tagged by model family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSpec {
    GradientBoosting(GradientBoostedRegressor),
}

impl ModelSpec {
    pub fn into_regressor(self) -> Box<dyn Regressor> {
        match self {
            ModelSpec::GradientBoosting(m) => Box::new(m),
        }
    }
}
