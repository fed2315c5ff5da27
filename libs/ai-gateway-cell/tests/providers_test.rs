use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ai_gateway_cell::{AiGatewayError, AiServiceManager, LlmRequest};
use assert_matches::assert_matches;
use shared_config::ProviderKind;
use shared_utils::test_utils::{MockLlmResponses, TestConfig};

#[tokio::test]
async fn test_groq_chat_completion() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groq/chat/completions"))
        .and(header_exists("authorization"))
        .and(body_partial_json(json!({ "model": "test-groq-model" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockLlmResponses::chat_completion("Stay hydrated.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_mock_server(&mock_server.uri())
        .with_providers(&[ProviderKind::Groq])
        .to_app_config();
    let manager = AiServiceManager::new(&config);

    let response = manager
        .generate(&LlmRequest::new("You are helpful", "Any tips?"))
        .await
        .unwrap();

    assert_eq!(response.provider, ProviderKind::Groq);
    assert_eq!(response.model, "test-groq-model");
    assert_eq!(response.text, "Stay hydrated.");
    assert!(!response.cached);
}

#[tokio::test]
async fn test_rejected_key_rotates_to_next_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groq/chat/completions"))
        .and(header("authorization", "Bearer test-key-1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/groq/chat/completions"))
        .and(header("authorization", "Bearer test-key-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockLlmResponses::chat_completion("second key works")))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_mock_server(&mock_server.uri())
        .with_providers(&[ProviderKind::Groq])
        .to_app_config();
    let manager = AiServiceManager::new(&config);

    let response = manager.generate(&LlmRequest::new("", "hello")).await.unwrap();
    assert_eq!(response.text, "second key works");
}

#[tokio::test]
async fn test_falls_back_from_groq_to_gemini() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groq/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("over capacity"))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/gemini/models/test-gemini-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockLlmResponses::gemini("{\"ok\": true}")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_mock_server(&mock_server.uri())
        .with_providers(&[ProviderKind::Groq, ProviderKind::Gemini])
        .to_app_config();
    let manager = AiServiceManager::new(&config);

    let response = manager.generate(&LlmRequest::new("", "json please").json()).await.unwrap();
    assert_eq!(response.provider, ProviderKind::Gemini);
    assert_eq!(response.text, "{\"ok\": true}");
}

#[tokio::test]
async fn test_gemini_sends_key_as_query_not_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gemini/models/test-gemini-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockLlmResponses::gemini("hi")))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_mock_server(&mock_server.uri())
        .with_providers(&[ProviderKind::Gemini])
        .to_app_config();
    let manager = AiServiceManager::new(&config);
    manager.generate(&LlmRequest::new("", "hello")).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let url = requests[0].url.to_string();
    assert!(url.contains("key=test-key-"));
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_huggingface_generation() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/huggingface/test-hf-model"))
        .and(body_partial_json(json!({ "parameters": { "return_full_text": false } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockLlmResponses::huggingface("  Rest and fluids.  ")))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_mock_server(&mock_server.uri())
        .with_providers(&[ProviderKind::HuggingFace])
        .to_app_config();
    let manager = AiServiceManager::new(&config);

    let response = manager.generate(&LlmRequest::new("", "cold remedies")).await.unwrap();
    assert_eq!(response.provider, ProviderKind::HuggingFace);
    assert_eq!(response.text, "Rest and fluids.");
}

#[tokio::test]
async fn test_all_vendors_down_reports_each_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_mock_server(&mock_server.uri())
        .with_providers(&[ProviderKind::Groq, ProviderKind::OpenRouter])
        .to_app_config();
    let manager = AiServiceManager::new(&config);

    let err = manager.generate(&LlmRequest::new("", "hello")).await.unwrap_err();
    assert_matches!(err, AiGatewayError::AllProvidersFailed(ref failures) if failures.len() == 2);
}
