use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::artifacts::ScoringPipeline;
use super::features::{IndustryFeatureVector, IndustryId};
use crate::error::ScoringError;
use crate::storage::{FeatureStore, RepositoryError};

/// Raw model output is multiplied by this before it is reported.
pub const GREEN_SCORE_SCALE: f64 = 10.0;

/// Scaled model output for one industry. Unbounded; the range depends on the
/// fitted model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GreenScore {
    pub industry: IndustryId,
    pub green_score: f64,
}

/// Looks up industry features and runs them through the fitted pipeline.
pub struct GreenScoreEstimator<S> {
    store: Arc<S>,
    pipeline: ScoringPipeline,
}

impl<S> GreenScoreEstimator<S>
where
    S: FeatureStore + 'static,
{
    pub fn new(store: Arc<S>, pipeline: ScoringPipeline) -> Self {
        Self { store, pipeline }
    }

    pub fn estimate(&self, industry: &str) -> Result<GreenScore, EstimatorError> {
        let industry = IndustryId::normalize(industry);
        let record = self
            .store
            .feature_record(&industry)?
            .ok_or_else(|| ScoringError::industry_not_found(industry.as_str()))?;

        let vector = IndustryFeatureVector::project(&record)?;
        let raw = self.pipeline.run(&vector)?;
        let green_score = raw * GREEN_SCORE_SCALE;

        info!(%industry, green_score, "green score estimated");
        Ok(GreenScore {
            industry,
            green_score,
        })
    }
}

/// Error raised by the green score estimator.
#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
