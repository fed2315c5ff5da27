use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use intent_cell::{create_intent_router, IntentPredictionModel, PredictiveIntentEngine};

fn app() -> axum::Router {
    create_intent_router(
        Arc::new(IntentPredictionModel::new()),
        Arc::new(PredictiveIntentEngine::new()),
    )
}

async fn predict(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_predicts_emergency() {
    let (status, json) = predict(app(), json!({ "text": "I think I'm having a heart attack" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["prediction"]["intent"], "emergency");
    assert_eq!(json["prediction"]["votes"].as_array().unwrap().len(), 3);
    assert_eq!(json["likely_next"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_session_history_shapes_likely_next() {
    let app = app();
    for text in ["hello", "I need to book an appointment"] {
        let (status, _) = predict(app.clone(), json!({ "text": text, "session_id": "s1" })).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, json) = predict(app, json!({ "text": "hi", "session_id": "s2" })).await;
    assert_eq!(json["prediction"]["intent"], "greeting");
    assert_eq!(json["likely_next"][0]["intent"], "appointment_request");
}

#[tokio::test]
async fn test_rejects_oversized_text() {
    let text = "a".repeat(2001);
    let (status, json) = predict(app(), json!({ "text": text })).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(json["error"].as_str().unwrap().contains("2001"));
}
