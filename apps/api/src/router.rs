use std::sync::Arc;

use axum::{http::Uri, middleware, routing::get, Router};
use chrono::Duration;

use ai_gateway_cell::{create_ai_router, AiServiceManager};
use analytics_cell::{create_analytics_router, AnalyticsError, PopulationAnalytics};
use conversation_cell::{create_conversation_router, ChatService, SessionStore};
use food_cell::{create_food_router, FoodRecognitionService};
use intent_cell::{create_intent_router, IntentPredictionModel, PredictiveIntentEngine};
use monitoring_cell::{
    create_monitoring_router, track_metrics, AiGatewayProbe, AnalyticsProbe, HealthMonitorService,
    MetricsCollectorService, SessionStoreProbe,
};
use shared_config::AppConfig;
use shared_models::error::AppError;
use soap_cell::create_soap_router;
use symptom_cell::create_symptom_router;

/// Long-lived services shared between cells.
pub struct AppServices {
    pub ai: Arc<AiServiceManager>,
    pub intents: Arc<IntentPredictionModel>,
    pub predictive: Arc<PredictiveIntentEngine>,
    pub sessions: Arc<SessionStore>,
    pub analytics: Arc<PopulationAnalytics>,
    pub chat: Arc<ChatService>,
    pub food: Arc<FoodRecognitionService>,
    pub metrics: Arc<MetricsCollectorService>,
    pub monitor: Arc<HealthMonitorService>,
}

impl AppServices {
    pub fn build(config: &AppConfig) -> Result<Self, AnalyticsError> {
        let ai = Arc::new(AiServiceManager::new(config));
        let intents = Arc::new(IntentPredictionModel::new());
        let predictive = Arc::new(PredictiveIntentEngine::with_capacity(config.session_capacity));
        let sessions = Arc::new(SessionStore::new(
            config.session_capacity,
            Duration::minutes(config.session_idle_timeout_mins),
        ));
        let analytics = Arc::new(PopulationAnalytics::new(config.k_anonymity_threshold)?);

        let chat = Arc::new(ChatService::new(
            sessions.clone(),
            intents.clone(),
            predictive.clone(),
            ai.clone(),
            analytics.clone(),
        ));
        let food = Arc::new(FoodRecognitionService::new(config, ai.clone()));

        let metrics = Arc::new(MetricsCollectorService::new());
        let monitor = Arc::new(HealthMonitorService::new(
            metrics.clone(),
            vec![
                Box::new(AiGatewayProbe(ai.clone())),
                Box::new(SessionStoreProbe(sessions.clone())),
                Box::new(AnalyticsProbe(analytics.clone())),
            ],
        ));

        Ok(Self {
            ai,
            intents,
            predictive,
            sessions,
            analytics,
            chat,
            food,
            metrics,
            monitor,
        })
    }
}

pub fn create_router(services: &AppServices) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic chat API is running!" }))
        .nest("/ai", create_ai_router(services.ai.clone()))
        .nest(
            "/intents",
            create_intent_router(services.intents.clone(), services.predictive.clone()),
        )
        .nest("/symptoms", create_symptom_router())
        .nest("/soap", create_soap_router(services.ai.clone()))
        .nest("/conversations", create_conversation_router(services.chat.clone()))
        .nest("/food", create_food_router(services.food.clone()))
        .nest("/analytics", create_analytics_router(services.analytics.clone()))
        .nest("/monitoring", create_monitoring_router(services.monitor.clone()))
        .fallback(unknown_route)
        .layer(middleware::from_fn_with_state(services.metrics.clone(), track_metrics))
}

async fn unknown_route(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
