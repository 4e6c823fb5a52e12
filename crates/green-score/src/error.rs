use crate::config::ConfigError;
use crate::consumption::{ConsumptionServiceError, ReadingImportError};
use crate::estimator::{ArtifactError, EstimatorError, FeatureStoreError};
use crate::telemetry::TelemetryError;
use std::fmt;

/// Failures raised by the scoring and forecasting core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// Unknown lookup key, e.g. an industry without a feature vector.
    #[error("{0}")]
    NotFound(String),
    /// The operation needed at least one reading and found none.
    #[error("{0}")]
    NoData(&'static str),
    /// Imputation, scaling, or inference failed.
    #[error("{0}")]
    Transform(String),
    /// Malformed numeric input rejected at the boundary.
    #[error("{0}")]
    Validation(String),
}

impl ScoringError {
    pub fn industry_not_found(industry: &str) -> Self {
        Self::NotFound(format!("Industry '{industry}' not found"))
    }
}

/// Process-level error covering startup, CLI reports, and serving.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Scoring(ScoringError),
    Artifact(ArtifactError),
    FeatureStore(FeatureStoreError),
    Import(ReadingImportError),
    Consumption(ConsumptionServiceError),
    Estimator(EstimatorError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
            AppError::Artifact(err) => write!(f, "artifact error: {}", err),
            AppError::FeatureStore(err) => write!(f, "feature store error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Consumption(err) => write!(f, "consumption error: {}", err),
            AppError::Estimator(err) => write!(f, "estimator error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Artifact(err) => Some(err),
            AppError::FeatureStore(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Consumption(err) => Some(err),
            AppError::Estimator(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}

impl From<ArtifactError> for AppError {
    fn from(value: ArtifactError) -> Self {
        Self::Artifact(value)
    }
}

impl From<FeatureStoreError> for AppError {
    fn from(value: FeatureStoreError) -> Self {
        Self::FeatureStore(value)
    }
}

impl From<ReadingImportError> for AppError {
    fn from(value: ReadingImportError) -> Self {
        Self::Import(value)
    }
}

impl From<ConsumptionServiceError> for AppError {
    fn from(value: ConsumptionServiceError) -> Self {
        Self::Consumption(value)
    }
}

impl From<EstimatorError> for AppError {
    fn from(value: EstimatorError) -> Self {
        Self::Estimator(value)
    }
}
