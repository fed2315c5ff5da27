use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

use ai_gateway_cell::AiServiceManager;
use analytics_cell::PopulationAnalytics;
use conversation_cell::SessionStore;
use monitoring_cell::{
    create_monitoring_router, track_metrics, AiGatewayProbe, AnalyticsProbe, HealthMonitorService,
    MetricsCollectorService, SessionStoreProbe,
};
use shared_utils::test_utils::TestConfig;

fn monitor() -> Arc<HealthMonitorService> {
    let config = TestConfig::default().to_app_config();
    Arc::new(HealthMonitorService::new(
        Arc::new(MetricsCollectorService::new()),
        vec![
            Box::new(AiGatewayProbe(Arc::new(AiServiceManager::new(&config)))),
            Box::new(SessionStoreProbe(Arc::new(SessionStore::new(10, Duration::minutes(5))))),
            Box::new(AnalyticsProbe(Arc::new(PopulationAnalytics::new(3).unwrap()))),
        ],
    ))
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health_reports_every_component() {
    let app = create_monitoring_router(monitor());
    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    // no provider configured in the test config
    assert_eq!(json["status"], "degraded");
    let names: Vec<&str> = json["components"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["component"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["http", "ai_gateway", "sessions", "analytics"]);
}

#[tokio::test]
async fn test_component_lookup() {
    let app = create_monitoring_router(monitor());

    let (status, json) = get_json(&app, "/health/analytics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["details"]["k_threshold"], 3);

    let (status, json) = get_json(&app, "/health/database").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Unknown component: database");
}

#[tokio::test]
async fn test_middleware_feeds_metrics() {
    let monitor = monitor();
    let metrics = monitor.metrics().clone();
    let app = Router::new()
        .route("/ping", get(|| async { "pong" }))
        .nest("/monitoring", create_monitoring_router(monitor))
        .layer(middleware::from_fn_with_state(metrics, track_metrics));

    get_json(&app, "/ping").await;
    get_json(&app, "/ping").await;
    let (status, json) = get_json(&app, "/monitoring/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_requests"], 2);
    assert_eq!(json["routes"]["GET /ping"]["requests"], 2);
}
