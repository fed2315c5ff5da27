use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use symptom_cell::create_symptom_router;

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = create_symptom_router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_analyze_returns_questions_and_urgency() {
    let (status, json) = post_json(
        "/analyze",
        json!({ "text": "I've had a bad cough and a fever for 3 days" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let symptoms = json["symptoms"].as_array().unwrap();
    assert_eq!(symptoms.len(), 2);
    assert_eq!(symptoms[0]["category"], "fever");
    assert_eq!(symptoms[0]["duration"]["hours"], 72.0);
    assert!(json["follow_up_questions"].as_array().unwrap().len() <= 5);
    assert_eq!(json["urgency"]["level"], "routine");
}

#[tokio::test]
async fn test_assess_with_elderly_patient_includes_relief() {
    let (status, json) = post_json(
        "/assess",
        json!({
            "description": "mild headache",
            "patient": { "age": 72, "chronic_conditions": ["hypertension"] }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let factors = json["assessment"]["urgency"]["factors"].as_array().unwrap();
    assert!(factors.iter().any(|f| f == "age 72"));
    assert_eq!(json["relief"][0]["kind"], "self_care");
    assert_eq!(json["relief"][0]["category"], "headache");
}

#[tokio::test]
async fn test_action_plan_for_emergency() {
    let (status, json) = post_json(
        "/action-plan",
        json!({ "description": "He collapsed and is not breathing" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["urgency"], "emergency");
    assert_eq!(json["steps"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_description_is_bad_request() {
    let (status, json) = post_json("/assess", json!({ "description": "   " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Symptom description is empty");
}
