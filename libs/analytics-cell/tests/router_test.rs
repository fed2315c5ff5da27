use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use analytics_cell::{create_analytics_router, Observation, PopulationAnalytics};
use shared_models::clinical::UrgencyLevel;
use symptom_cell::SymptomCategory;

#[tokio::test]
async fn test_population_endpoint_reports_only_k_anonymous_groups() {
    let analytics = Arc::new(PopulationAnalytics::new(2).unwrap());
    for sex in ["female", "male"] {
        analytics
            .record(Observation::new(Some(68), Some(sex), vec![SymptomCategory::Dizziness], UrgencyLevel::Urgent))
            .await;
    }
    analytics
        .record(Observation::new(Some(12), None, vec![SymptomCategory::SkinRash], UrgencyLevel::Routine))
        .await;

    let response = create_analytics_router(analytics)
        .oneshot(Request::builder().uri("/population").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["k_threshold"], 2);
    assert_eq!(json["groups"].as_array().unwrap().len(), 1);
    assert_eq!(json["groups"][0]["age_band"], "65+");
    assert_eq!(json["groups"][0]["category"], "dizziness");
    assert_eq!(json["groups"][0]["urgency_distribution"]["urgent"], 2);
    assert_eq!(json["suppressed_groups"], 1);
    // one female, one male and one unknown: every sex group is below k
    assert!(json["sex_groups"].as_array().unwrap().is_empty());
    assert_eq!(json["suppressed_sex_groups"], 3);
}
