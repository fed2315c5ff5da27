// =====================================================================================
// MONITORING CELL - HEALTH & PERFORMANCE MONITORING
// =====================================================================================
//
// - request metrics collected by an axum middleware (counts, p95, per route)
// - component health: AI providers and their circuits, session store load,
//   population analytics
//
// =====================================================================================

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;

pub use models::{ComponentHealth, HealthStatus, MetricsSnapshot, MonitoringError, SystemHealth};
pub use services::{
    AiGatewayProbe, AnalyticsProbe, HealthMonitorService, HealthProbe, MetricsCollectorService,
    SessionStoreProbe,
};

pub use middleware::track_metrics;
pub use router::create_monitoring_router;
