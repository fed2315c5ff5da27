// =====================================================================================
// ANALYTICS CELL - POPULATION INSIGHTS WITH K-ANONYMITY
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{AgeBand, AnalyticsError, Observation, PopulationInsights, Sex};
pub use router::create_analytics_router;
pub use services::PopulationAnalytics;
