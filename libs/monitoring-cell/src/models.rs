// =====================================================================================
// MONITORING CELL MODELS
// =====================================================================================

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub component: String,
    pub status: HealthStatus,
    pub message: Option<String>,
    pub details: BTreeMap<String, Value>,
}

impl ComponentHealth {
    pub fn new(component: impl Into<String>, status: HealthStatus) -> Self {
        Self {
            component: component.into(),
            status,
            message: None,
            details: BTreeMap::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemHealth {
    pub status: HealthStatus,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RouteStats {
    pub requests: u64,
    pub errors: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_per_second: f64,
    pub average_response_time_ms: f64,
    pub p95_response_time_ms: f64,
    pub error_rate_percentage: f64,
    pub total_requests: u64,
    pub total_errors: u64,
    pub uptime_seconds: u64,
    pub routes: BTreeMap<String, RouteStats>,
}

#[derive(Debug, thiserror::Error)]
pub enum MonitoringError {
    #[error("Unknown component: {0}")]
    UnknownComponent(String),
}

impl IntoResponse for MonitoringError {
    fn into_response(self) -> Response {
        let status = match self {
            MonitoringError::UnknownComponent(_) => StatusCode::NOT_FOUND,
        };
        (
            status,
            Json(serde_json::json!({
                "error": self.to_string(),
                "timestamp": chrono::Utc::now()
            })),
        )
            .into_response()
    }
}
