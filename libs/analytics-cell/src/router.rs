use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::services::PopulationAnalytics;

pub fn create_analytics_router(analytics: Arc<PopulationAnalytics>) -> Router {
    Router::new()
        .route("/population", get(handlers::get_population_insights))
        .with_state(analytics)
}
