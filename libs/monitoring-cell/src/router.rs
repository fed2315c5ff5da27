// =====================================================================================
// MONITORING CELL ROUTER
// =====================================================================================

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers::{get_component_health, get_current_metrics, get_health_status};
use crate::services::HealthMonitorService;

pub fn create_monitoring_router(monitor: Arc<HealthMonitorService>) -> Router {
    Router::new()
        .route("/health", get(get_health_status))
        .route("/health/{component}", get(get_component_health))
        .route("/metrics", get(get_current_metrics))
        .with_state(monitor)
}
