use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ai_gateway_cell::AiServiceManager;
use shared_config::ProviderKind;
use shared_utils::test_utils::{MockLlmResponses, TestConfig};
use soap_cell::create_soap_router;

async fn post_json(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/generate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn transcript() -> Value {
    json!([
        { "speaker": "assistant", "text": "What brings you in today?" },
        { "speaker": "patient", "text": "I have a sore throat and a fever since yesterday" },
        { "speaker": "patient", "text": "My temperature was 38.4" }
    ])
}

#[tokio::test]
async fn test_generates_note_with_reported_vitals() {
    let manager = Arc::new(AiServiceManager::new(&TestConfig::default().to_app_config()));
    let (status, json) = post_json(create_soap_router(manager), json!({ "transcript": transcript() })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["note"]["subjective"]["chief_complaint"],
        "I have a sore throat and a fever since yesterday"
    );
    assert_eq!(json["note"]["objective"]["vitals"]["temperature_c"], 38.4);
    assert!(json["text"].as_str().unwrap().starts_with("SUBJECTIVE"));
}

#[tokio::test]
async fn test_enhancement_appends_model_summary() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groq/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockLlmResponses::chat_completion(
            "Likely viral pharyngitis with low-grade fever; routine follow-up.",
        )))
        .mount(&mock_server)
        .await;
    let config = TestConfig::with_mock_server(&mock_server.uri())
        .with_providers(&[ProviderKind::Groq])
        .to_app_config();
    let manager = Arc::new(AiServiceManager::new(&config));

    let (status, json) = post_json(
        create_soap_router(manager),
        json!({ "transcript": transcript(), "enhance": true }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["note"]["assessment"]["ai_summary"],
        "Likely viral pharyngitis with low-grade fever; routine follow-up."
    );
    assert!(json["text"].as_str().unwrap().contains("Clinical summary: Likely viral pharyngitis"));
}

#[tokio::test]
async fn test_enhancement_failure_keeps_note() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    let config = TestConfig::with_mock_server(&mock_server.uri())
        .with_providers(&[ProviderKind::Groq])
        .to_app_config();
    let manager = Arc::new(AiServiceManager::new(&config));

    let (status, json) = post_json(
        create_soap_router(manager),
        json!({ "transcript": transcript(), "enhance": true }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["note"]["assessment"]["ai_summary"].is_null());
}

#[tokio::test]
async fn test_rejects_transcript_without_patient_turns() {
    let manager = Arc::new(AiServiceManager::new(&TestConfig::default().to_app_config()));
    let (status, _) = post_json(
        create_soap_router(manager),
        json!({ "transcript": [{ "speaker": "assistant", "text": "Hello" }] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
