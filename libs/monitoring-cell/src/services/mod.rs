pub mod health;
pub mod metrics;

pub use health::{AiGatewayProbe, AnalyticsProbe, HealthMonitorService, HealthProbe, SessionStoreProbe};
pub use metrics::MetricsCollectorService;
