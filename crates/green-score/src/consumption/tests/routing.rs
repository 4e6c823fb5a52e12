use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::consumption::recommendations::{ENERGY_ADVICE, WASTE_ADVICE};
use crate::consumption::{consumption_router, ConsumptionService};

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn submit_route_records_reading() {
    let (service, repository) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/submit",
            json!({ "timestamp": "2025-05-04T09:30:00", "energy": 120, "water": 45.5, "waste": 3 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(read_json_body(response).await, json!({ "status": "success" }));
    assert_eq!(repository.readings.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn submit_route_rejects_negative_values() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/submit",
            json!({ "timestamp": "2025-05-04T09:30:00", "energy": -1, "water": 1, "waste": 1 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().unwrap().contains("energy"));
}

#[tokio::test]
async fn score_route_returns_not_found_without_data() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router.oneshot(get("/score")).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "No consumption data available" })
    );
}

#[tokio::test]
async fn score_route_returns_breakdown() {
    let (service, _) = build_service();
    service
        .submit(submission(fixed(4, 9), 250.0, 125.0, 25.0))
        .expect("submit");
    let router = router_with_service(service);

    let response = router.oneshot(get("/score")).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["timestamp"], "2025-05-04T09:00:00Z");
    assert_eq!(payload["data"]["energy"], 250.0);
    assert_eq!(payload["score"]["overall_score"], 75.0);
}

#[tokio::test]
async fn trend_route_aggregates_recent_days() {
    let (service, _) = build_service();
    service.submit(submission(at(30, 12), 0.0, 0.0, 0.0)).expect("submit");
    service.submit(submission(at(2, 8), 0.0, 0.0, 0.0)).expect("submit");
    service
        .submit(submission(at(2, 9), 1000.0, 500.0, 100.0))
        .expect("submit");
    service
        .submit(submission(at(1, 9), 250.0, 125.0, 25.0))
        .expect("submit");
    let router = router_with_service(service);

    let response = router.oneshot(get("/trend")).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let trend = payload["trend"].as_array().expect("trend array");
    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0]["score"], 50.0);
    assert_eq!(trend[0]["energy"], 500.0);
    assert_eq!(trend[1]["score"], 75.0);
}

#[tokio::test]
async fn trend_route_returns_not_found_for_stale_history() {
    let (service, _) = build_service();
    service.submit(submission(at(40, 12), 1.0, 1.0, 1.0)).expect("submit");
    let router = router_with_service(service);

    let response = router.oneshot(get("/trend")).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "No consumption data available for trend analysis" })
    );
}

#[tokio::test]
async fn recommendations_route_lists_triggered_rules() {
    let (service, _) = build_service();
    service
        .submit(submission(fixed(4, 9), 800.0, 100.0, 70.0))
        .expect("submit");
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/recommendations"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json_body(response).await,
        json!({ "recommendations": [ENERGY_ADVICE, WASTE_ADVICE] })
    );
}

#[tokio::test]
async fn export_route_serves_csv_attachment() {
    let (service, _) = build_service();
    service
        .submit(submission(fixed(4, 9), 10.0, 20.0, 30.0))
        .expect("submit");
    let router = router_with_service(service);

    let response = router.oneshot(get("/export")).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"consumption_data.csv\""
    );
    let body = String::from_utf8(read_body(response).await).expect("utf-8");
    assert_eq!(
        body,
        "timestamp,energy,water,waste\n2025-05-04T09:00:00Z,10.0,20.0,30.0\n"
    );
}

#[tokio::test]
async fn predict_route_returns_prediction() {
    let (service, _) = build_service();
    service
        .submit(submission(fixed(4, 9), 400.0, 200.0, 40.0))
        .expect("submit");
    service
        .submit(submission(fixed(5, 9), 400.0, 200.0, 40.0))
        .expect("submit");
    let router = router_with_service(service);

    let response = router.oneshot(get("/predict")).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let predicted = payload["predicted_score"].as_f64().expect("number");
    assert!((predicted - 60.0).abs() < 1e-9);
}

#[tokio::test]
async fn repository_outage_maps_to_internal_error() {
    let router = consumption_router(Arc::new(ConsumptionService::new(Arc::new(
        UnavailableRepository,
    ))));

    let response = router.oneshot(get("/predict")).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
