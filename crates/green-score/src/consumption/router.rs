use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, warn};

use super::domain::ReadingSubmission;
use super::export::EXPORT_FILE_NAME;
use super::service::{ConsumptionService, ConsumptionServiceError};
use crate::error::ScoringError;
use crate::storage::ReadingRepository;

/// Router builder exposing submission, scoring, trend, recommendation,
/// export, and prediction endpoints.
pub fn consumption_router<R>(service: Arc<ConsumptionService<R>>) -> Router
where
    R: ReadingRepository + 'static,
{
    Router::new()
        .route("/submit", post(submit_handler::<R>))
        .route("/score", get(score_handler::<R>))
        .route("/trend", get(trend_handler::<R>))
        .route("/recommendations", get(recommendations_handler::<R>))
        .route("/export", get(export_handler::<R>))
        .route("/predict", get(predict_handler::<R>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ConsumptionService<R>>>,
    Json(submission): Json<ReadingSubmission>,
) -> Result<Response, ConsumptionServiceError>
where
    R: ReadingRepository + 'static,
{
    service.submit(submission)?;
    Ok((StatusCode::CREATED, Json(json!({ "status": "success" }))).into_response())
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<ConsumptionService<R>>>,
) -> Result<Response, ConsumptionServiceError>
where
    R: ReadingRepository + 'static,
{
    let report = service.latest_score()?;
    Ok(Json(report).into_response())
}

pub(crate) async fn trend_handler<R>(
    State(service): State<Arc<ConsumptionService<R>>>,
) -> Result<Response, ConsumptionServiceError>
where
    R: ReadingRepository + 'static,
{
    let points = service.trend(Utc::now())?;
    Ok(Json(json!({ "trend": points })).into_response())
}

pub(crate) async fn recommendations_handler<R>(
    State(service): State<Arc<ConsumptionService<R>>>,
) -> Result<Response, ConsumptionServiceError>
where
    R: ReadingRepository + 'static,
{
    let recommendations = service.recommendations()?;
    Ok(Json(json!({ "recommendations": recommendations })).into_response())
}

pub(crate) async fn export_handler<R>(
    State(service): State<Arc<ConsumptionService<R>>>,
) -> Result<Response, ConsumptionServiceError>
where
    R: ReadingRepository + 'static,
{
    let body = service.export_csv()?;
    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub(crate) async fn predict_handler<R>(
    State(service): State<Arc<ConsumptionService<R>>>,
) -> Result<Response, ConsumptionServiceError>
where
    R: ReadingRepository + 'static,
{
    let predicted_score = service.predict()?;
    Ok(Json(json!({ "predicted_score": predicted_score })).into_response())
}

impl IntoResponse for ConsumptionServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ConsumptionServiceError::Scoring(ScoringError::NotFound(_))
            | ConsumptionServiceError::Scoring(ScoringError::NoData(_)) => StatusCode::NOT_FOUND,
            ConsumptionServiceError::Scoring(ScoringError::Validation(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ConsumptionServiceError::Scoring(ScoringError::Transform(_))
            | ConsumptionServiceError::Repository(_)
            | ConsumptionServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self, "consumption request failed");
        } else {
            warn!(error = %self, "consumption request rejected");
        }

        let payload = json!({ "error": self.to_string() });
        (status, Json(payload)).into_response()
    }
}
