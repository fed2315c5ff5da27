use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ai_gateway_cell::AiServiceManager;
use food_cell::{create_food_router, FoodRecognitionService};
use shared_config::ProviderKind;
use shared_utils::test_utils::{MockLlmResponses, TestConfig};

const IMAGE: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

fn app(config: &TestConfig) -> Router {
    let config = config.to_app_config();
    let ai = Arc::new(AiServiceManager::new(&config));
    create_food_router(Arc::new(FoodRecognitionService::new(&config, ai)))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn mount_model(server: &MockServer, prompt_marker: &str, answer: Value) {
    Mock::given(method("POST"))
        .and(path("/openrouter/chat/completions"))
        .and(body_string_contains(prompt_marker))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockLlmResponses::chat_completion(&answer.to_string())))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_photo_runs_all_four_stages() {
    let server = MockServer::start().await;
    mount_model(
        &server,
        "List every distinct food",
        json!({ "items": [
            { "name": "grilled chicken", "portion_grams": 150, "confidence": 0.9 },
            { "name": "rice", "portion_grams": 200, "confidence": 0.8 }
        ]}),
    )
    .await;
    mount_model(
        &server,
        "Estimate the nutrient content",
        json!({ "items": [
            { "name": "grilled chicken", "calories": 240, "protein_g": 45 },
            { "name": "rice", "calories": 270, "carbs_g": 56 }
        ]}),
    )
    .await;
    mount_model(
        &server,
        "healthier alternatives",
        json!({ "alternatives": ["Swap white rice for brown rice", "Add steamed vegetables"] }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/usda/foods/search"))
        .and(query_param("query", "grilled chicken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "foods": [{
                "description": "Chicken, broilers or fryers, breast, meat only, cooked, roasted",
                "foodNutrients": [
                    { "nutrientNumber": "208", "value": 165.0 },
                    { "nutrientNumber": "203", "value": 31.0 },
                    { "nutrientNumber": "204", "value": 3.6 }
                ]
            }]
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/usda/foods/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "foods": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/off/cgi/search.pl"))
        .and(query_param("search_terms", "rice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{
                "product_name": "Basmati rice",
                "nutriments": { "energy-kcal_100g": 130, "carbohydrates_100g": "28.2", "sodium_100g": 0.001 }
            }]
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/off/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
        .mount(&server)
        .await;

    let config = TestConfig::with_mock_server(&server.uri()).with_providers(&[ProviderKind::OpenRouter]);
    let (status, json) = post_json(app(&config), "/analyze", json!({ "image_base64": IMAGE })).await;

    assert_eq!(status, StatusCode::OK);
    let items = json["items"].as_array().unwrap();
    assert_eq!(items[0]["source"], "usda");
    assert_eq!(items[0]["nutrients"]["calories"], 248.0);
    assert_eq!(items[1]["source"], "open_food_facts");
    assert_eq!(items[1]["database_match"], "Basmati rice");
    assert_eq!(items[1]["nutrients"]["sodium_mg"], 2.0);
    assert_eq!(json["totals"]["calories"], 508.0);
    assert_eq!(json["stage_confidence"]["database"], 1.0);
    assert_eq!(json["alternatives_source"], "ai");
    assert_eq!(json["alternatives"][0], "Swap white rice for brown rice");
}

#[tokio::test]
async fn test_database_outage_keeps_model_estimate() {
    let server = MockServer::start().await;
    mount_model(
        &server,
        "Estimate the nutrient content",
        json!({ "items": [{ "name": "lentil soup", "calories": 180, "fiber_g": 8, "protein_g": 12 }] }),
    )
    .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = TestConfig::with_mock_server(&server.uri()).with_providers(&[ProviderKind::OpenRouter]);
    let (status, json) = post_json(
        app(&config),
        "/analyze",
        json!({ "food_name": "lentil soup", "portion_grams": 300 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"][0]["source"], "ai");
    assert_eq!(json["items"][0]["nutrients"]["calories"], 180.0);
    assert_eq!(json["stage_confidence"]["database"], 0.0);
    // 100 + 1.5 * 8 + 0.3 * 12, capped
    assert_eq!(json["health_score"], 100.0);
    // the alternatives prompt is unmatched, so the static table answers
    assert_eq!(json["alternatives_source"], "fallback");
}

#[tokio::test]
async fn test_weighed_photo_scales_recognised_portion() {
    let server = MockServer::start().await;
    mount_model(
        &server,
        "List every distinct food",
        json!({ "items": [{ "name": "banana", "portion_grams": 100, "confidence": 0.9 }] }),
    )
    .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = TestConfig::with_mock_server(&server.uri()).with_providers(&[ProviderKind::OpenRouter]);
    let (status, json) = post_json(
        app(&config),
        "/analyze",
        json!({ "image_base64": IMAGE, "portion_grams": 240 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"][0]["portion_grams"], 240.0);
}

#[tokio::test]
async fn test_recognize_errors() {
    let app = app(&TestConfig::default());

    let (status, _) = post_json(app.clone(), "/recognize", json!({ "image_base64": IMAGE })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, json) = post_json(app.clone(), "/recognize", json!({ "image_base64": "%%%" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Image is not valid base64");

    let (status, _) = post_json(app, "/analyze", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_recognition_is_unprocessable() {
    let server = MockServer::start().await;
    mount_model(&server, "List every distinct food", json!({ "items": [] })).await;

    let config = TestConfig::with_mock_server(&server.uri()).with_providers(&[ProviderKind::OpenRouter]);
    let (status, _) = post_json(app(&config), "/recognize", json!({ "image_base64": IMAGE })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
