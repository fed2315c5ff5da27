use std::sync::Arc;

use axum::{extract::State, Json};

use crate::models::PopulationInsights;
use crate::services::PopulationAnalytics;

pub async fn get_population_insights(
    State(analytics): State<Arc<PopulationAnalytics>>,
) -> Json<PopulationInsights> {
    Json(analytics.population_insights().await)
}
