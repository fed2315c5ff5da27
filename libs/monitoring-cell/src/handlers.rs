// =====================================================================================
// MONITORING CELL HANDLERS
// =====================================================================================

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::models::{ComponentHealth, HealthStatus, MetricsSnapshot, MonitoringError, SystemHealth};
use crate::services::HealthMonitorService;

/// 503 when any component is unhealthy, so load balancers can act on it.
#[instrument(skip(monitor))]
pub async fn get_health_status(
    State(monitor): State<Arc<HealthMonitorService>>,
) -> (StatusCode, Json<SystemHealth>) {
    let health = monitor.check_all().await;
    let status = match health.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    (status, Json(health))
}

pub async fn get_component_health(
    State(monitor): State<Arc<HealthMonitorService>>,
    Path(component): Path<String>,
) -> Result<Json<ComponentHealth>, MonitoringError> {
    monitor
        .check_component(&component)
        .await
        .map(Json)
        .ok_or(MonitoringError::UnknownComponent(component))
}

pub async fn get_current_metrics(State(monitor): State<Arc<HealthMonitorService>>) -> Json<MetricsSnapshot> {
    Json(monitor.metrics().get_current_stats().await)
}
