//! Pre-fitted imputer, scaler, and model loaded once at startup.
//!
//! The bundle is a JSON document exported from the training pipeline:
//!
//! ```json
//! {
//!   "imputer": { "strategy": "mean", "statistics": [10 values] },
//!   "scaler":  { "mean": [10 values], "scale": [10 values] },
//!   "model":   { "kind": "linear", "coefficients": [10 values], "intercept": 0.0 }
//! }
//! ```
//!
//! Every vector is positional and follows [`FEATURE_NAMES`](super::FEATURE_NAMES).
//! A classifier is exported as
//! `{ "kind": "logistic", "coefficients": [..], "intercept": 0.0, "classes": [0, 1] }`
//! and scores with the predicted class label.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use super::features::{FeatureValues, IndustryFeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::error::ScoringError;

/// Fills missing feature values.
pub trait Imputer: Send + Sync {
    fn impute(&self, values: &[Option<f64>; FEATURE_COUNT]) -> Result<FeatureValues, ScoringError>;
}

/// Rescales a complete feature row.
pub trait Scaler: Send + Sync {
    fn transform(&self, values: &FeatureValues) -> Result<FeatureValues, ScoringError>;
}

/// Maps a scaled feature row to a raw score.
pub trait ScoreModel: Send + Sync {
    fn predict(&self, values: &FeatureValues) -> Result<f64, ScoringError>;
}

/// Strategy the imputer was fitted with. Informational only: imputation
/// always fills from the fitted `statistics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    Mean,
    Median,
    MostFrequent,
    Constant,
}

/// Replaces missing values with per-column statistics learned at fit time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FittedImputer {
    pub strategy: ImputeStrategy,
    pub statistics: Vec<f64>,
}

impl Imputer for FittedImputer {
    fn impute(&self, values: &[Option<f64>; FEATURE_COUNT]) -> Result<FeatureValues, ScoringError> {
        let mut imputed = [0.0; FEATURE_COUNT];
        for (index, (slot, value)) in imputed.iter_mut().zip(values).enumerate() {
            let filled = match value.filter(|value| !value.is_nan()) {
                Some(value) => value,
                None => self.statistics.get(index).copied().unwrap_or(f64::NAN),
            };
            if !filled.is_finite() {
                return Err(ScoringError::Transform(format!(
                    "imputer produced non-finite value for '{}'",
                    FEATURE_NAMES[index]
                )));
            }
            *slot = filled;
        }
        Ok(imputed)
    }
}

/// Standardizes each column as `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FittedScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler for FittedScaler {
    fn transform(&self, values: &FeatureValues) -> Result<FeatureValues, ScoringError> {
        let mut scaled = [0.0; FEATURE_COUNT];
        for (index, slot) in scaled.iter_mut().enumerate() {
            let (Some(&mean), Some(&scale)) = (self.mean.get(index), self.scale.get(index)) else {
                return Err(ScoringError::Transform(format!(
                    "scaler has no parameters for '{}'",
                    FEATURE_NAMES[index]
                )));
            };
            // Zero-variance columns were fitted with unit scale.
            let scale = if scale == 0.0 { 1.0 } else { scale };
            *slot = (values[index] - mean) / scale;
        }
        Ok(scaled)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedModel {
    /// Linear regressor: `intercept + coefficients · x`.
    Linear { coefficients: Vec<f64>, intercept: f64 },
    /// Binary logistic classifier. Predicts `classes[1]` when the decision
    /// value is positive, otherwise `classes[0]`.
    Logistic {
        coefficients: Vec<f64>,
        intercept: f64,
        classes: [f64; 2],
    },
}

impl FittedModel {
    fn coefficients(&self) -> &[f64] {
        match self {
            Self::Linear { coefficients, .. } | Self::Logistic { coefficients, .. } => {
                coefficients
            }
        }
    }
}

impl ScoreModel for FittedModel {
    fn predict(&self, values: &FeatureValues) -> Result<f64, ScoringError> {
        let output = match self {
            Self::Linear {
                coefficients,
                intercept,
            } => intercept + dot(coefficients, values),
            Self::Logistic {
                coefficients,
                intercept,
                classes,
            } => {
                let decision = intercept + dot(coefficients, values);
                if decision > 0.0 {
                    classes[1]
                } else {
                    classes[0]
                }
            }
        };

        if output.is_finite() {
            Ok(output)
        } else {
            Err(ScoringError::Transform(format!(
                "model produced non-finite output {output}"
            )))
        }
    }
}

fn dot(coefficients: &[f64], values: &FeatureValues) -> f64 {
    coefficients
        .iter()
        .zip(values)
        .map(|(coefficient, value)| coefficient * value)
        .sum()
}

/// Serialized artifact set as exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArtifactBundle {
    pub imputer: FittedImputer,
    pub scaler: FittedScaler,
    pub model: FittedModel,
}

impl ArtifactBundle {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let bundle: Self = serde_json::from_reader(reader)?;
        bundle.validate()?;
        Ok(bundle)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        let shapes = [
            ("imputer.statistics", self.imputer.statistics.len()),
            ("scaler.mean", self.scaler.mean.len()),
            ("scaler.scale", self.scaler.scale.len()),
            ("model.coefficients", self.model.coefficients().len()),
        ];

        for (artifact, found) in shapes {
            if found != FEATURE_COUNT {
                return Err(ArtifactError::Shape {
                    artifact,
                    expected: FEATURE_COUNT,
                    found,
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read artifact bundle: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid artifact bundle: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{artifact} has {found} entries, expected {expected}")]
    Shape {
        artifact: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Imputer → scaler → model, shared read-only across requests.
#[derive(Clone)]
pub struct ScoringPipeline {
    imputer: Arc<dyn Imputer>,
    scaler: Arc<dyn Scaler>,
    model: Arc<dyn ScoreModel>,
}

impl ScoringPipeline {
    pub fn new(
        imputer: Arc<dyn Imputer>,
        scaler: Arc<dyn Scaler>,
        model: Arc<dyn ScoreModel>,
    ) -> Self {
        Self {
            imputer,
            scaler,
            model,
        }
    }

    pub fn from_bundle(bundle: ArtifactBundle) -> Self {
        Self::new(
            Arc::new(bundle.imputer),
            Arc::new(bundle.scaler),
            Arc::new(bundle.model),
        )
    }

    /// Raw model output for one projected feature vector.
    pub fn run(&self, vector: &IndustryFeatureVector) -> Result<f64, ScoringError> {
        let imputed = self.imputer.impute(&vector.values)?;
        let scaled = self.scaler.transform(&imputed)?;
        self.model.predict(&scaled)
    }
}
