//! Feature-based green score estimation from pre-fitted artifacts.

pub mod artifacts;
pub mod features;
pub mod router;
pub mod service;
pub mod store;

pub use artifacts::{
    ArtifactBundle, ArtifactError, FittedImputer, FittedModel, FittedScaler, ImputeStrategy,
    Imputer, Scaler, ScoreModel, ScoringPipeline,
};
pub use features::{
    FeatureRecord, FeatureValues, IndustryFeatureVector, IndustryId, FEATURE_COUNT, FEATURE_NAMES,
};
pub use router::{estimator_router, estimator_unavailable_handler};
pub use service::{EstimatorError, GreenScore, GreenScoreEstimator, GREEN_SCORE_SCALE};
pub use store::{CsvFeatureStore, FeatureStoreError};
