use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{error, info};

use super::service::{EstimatorError, GreenScoreEstimator};
use crate::error::ScoringError;
use crate::storage::FeatureStore;

/// Router builder exposing the feature-based green score endpoint.
pub fn estimator_router<S>(estimator: Arc<GreenScoreEstimator<S>>) -> Router
where
    S: FeatureStore + 'static,
{
    Router::new()
        .route(
            "/calculate_green_score/:industry",
            get(green_score_handler::<S>),
        )
        .with_state(estimator)
}

pub(crate) async fn green_score_handler<S>(
    State(estimator): State<Arc<GreenScoreEstimator<S>>>,
    Path(industry): Path<String>,
) -> Response
where
    S: FeatureStore + 'static,
{
    info!(%industry, "fetching green score");

    match estimator.estimate(&industry) {
        Ok(score) => (StatusCode::OK, Json(score)).into_response(),
        Err(EstimatorError::Scoring(err @ ScoringError::NotFound(_))) => {
            error!(error = %err, "industry lookup failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "error calculating green score");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

/// Fallback used when no artifact bundle was configured.
pub async fn estimator_unavailable_handler() -> Response {
    let payload = json!({ "error": "green score estimator is not configured" });
    (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
}
