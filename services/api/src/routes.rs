use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use green_score::consumption::{consumption_router, ConsumptionService};
use green_score::estimator::{estimator_router, estimator_unavailable_handler, GreenScoreEstimator};
use green_score::storage::{FeatureStore, ReadingRepository};
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) const WELCOME_MESSAGE: &str = "Welcome to the Green Score API";

#[derive(Debug, Serialize)]
pub(crate) struct WelcomeResponse {
    pub(crate) message: &'static str,
}

/// Full service surface. Without an estimator the industry endpoint answers 503.
pub(crate) fn with_service_routes<R, S>(
    consumption: Arc<ConsumptionService<R>>,
    estimator: Option<Arc<GreenScoreEstimator<S>>>,
) -> Router
where
    R: ReadingRepository + 'static,
    S: FeatureStore + 'static,
{
    let estimator_routes = match estimator {
        Some(estimator) => estimator_router(estimator),
        None => Router::new().route(
            "/calculate_green_score/:industry",
            get(estimator_unavailable_handler),
        ),
    };

    consumption_router(consumption)
        .merge(estimator_routes)
        .route("/", get(welcome))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
    })
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Acquire);
    let (status, label) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "initializing")
    };

    (status, Json(json!({ "status": label })))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
