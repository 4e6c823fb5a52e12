use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryReadingRepository};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use green_score::config::{AppConfig, ScoringConfig};
use green_score::consumption::ConsumptionService;
use green_score::error::AppError;
use green_score::estimator::{
    ArtifactBundle, CsvFeatureStore, GreenScoreEstimator, ScoringPipeline,
};
use green_score::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let estimator = load_estimator(&config.scoring)?;
    let repository = Arc::new(InMemoryReadingRepository::default());
    let consumption = Arc::new(ConsumptionService::with_trend_window(
        repository,
        config.scoring.trend_window_days,
    ));

    let app = with_service_routes(consumption, estimator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        trend_window_days = config.scoring.trend_window_days,
        "green score service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Artifacts are loaded once; an absent feature file leaves every lookup as not found.
fn load_estimator(
    scoring: &ScoringConfig,
) -> Result<Option<Arc<GreenScoreEstimator<CsvFeatureStore>>>, AppError> {
    let Some(artifacts_path) = scoring.artifacts_path.as_ref() else {
        warn!("GREEN_SCORE_ARTIFACTS not set; industry scoring disabled");
        return Ok(None);
    };

    let bundle = ArtifactBundle::from_path(artifacts_path)?;
    info!(
        path = %artifacts_path.display(),
        strategy = ?bundle.imputer.strategy,
        "artifact bundle loaded"
    );

    let store = match scoring.features_path.as_ref() {
        Some(path) => {
            let store = CsvFeatureStore::from_path(path)?;
            info!(path = %path.display(), industries = store.len(), "feature store loaded");
            store
        }
        None => {
            warn!("GREEN_SCORE_FEATURES not set; no industries available");
            CsvFeatureStore::empty()
        }
    };

    Ok(Some(Arc::new(GreenScoreEstimator::new(
        Arc::new(store),
        ScoringPipeline::from_bundle(bundle),
    ))))
}
