// =====================================================================================
// HEALTH MONITORING SERVICE
// =====================================================================================

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use ai_gateway_cell::AiServiceManager;
use analytics_cell::PopulationAnalytics;
use conversation_cell::SessionStore;

use crate::models::{ComponentHealth, HealthStatus, SystemHealth};
use crate::services::MetricsCollectorService;

/// Session load at which new conversations start evicting old ones.
const SESSION_LOAD_DEGRADED: f64 = 0.9;
const ERROR_RATE_DEGRADED: f64 = 10.0;
/// Too few requests for the error rate to mean anything.
const MIN_REQUESTS_FOR_ERROR_RATE: u64 = 20;
const P95_DEGRADED_MS: f64 = 5000.0;

#[async_trait]
pub trait HealthProbe: Send + Sync {
    fn component(&self) -> &'static str;

    async fn check(&self) -> ComponentHealth;
}

pub struct AiGatewayProbe(pub Arc<AiServiceManager>);

#[async_trait]
impl HealthProbe for AiGatewayProbe {
    fn component(&self) -> &'static str {
        "ai_gateway"
    }

    async fn check(&self) -> ComponentHealth {
        let status = self.0.status().await;
        let open = status.providers.iter().filter(|p| p.circuit == "open").count();
        let total = status.providers.len();

        let health = if total == 0 {
            ComponentHealth::new(self.component(), HealthStatus::Degraded)
                .with_message("No AI provider configured; static fallbacks in use")
        } else if open == total {
            ComponentHealth::new(self.component(), HealthStatus::Unhealthy)
                .with_message("Every provider circuit is open")
        } else if open > 0 {
            ComponentHealth::new(self.component(), HealthStatus::Degraded)
                .with_message(format!("{open} of {total} provider circuits open"))
        } else {
            ComponentHealth::new(self.component(), HealthStatus::Healthy)
        };

        health
            .with_detail("providers", serde_json::to_value(&status.providers).unwrap_or_default())
            .with_detail("cache_entries", status.cache_entries)
            .with_detail("cache_hits", status.cache_hits)
            .with_detail("cache_misses", status.cache_misses)
    }
}

pub struct SessionStoreProbe(pub Arc<SessionStore>);

#[async_trait]
impl HealthProbe for SessionStoreProbe {
    fn component(&self) -> &'static str {
        "sessions"
    }

    async fn check(&self) -> ComponentHealth {
        let active = self.0.len().await;
        let capacity = self.0.capacity();
        let load = active as f64 / capacity as f64;

        let health = if load >= SESSION_LOAD_DEGRADED {
            ComponentHealth::new(self.component(), HealthStatus::Degraded)
                .with_message("Session store near capacity; idle sessions are being evicted")
        } else {
            ComponentHealth::new(self.component(), HealthStatus::Healthy)
        };
        health
            .with_detail("active", active)
            .with_detail("capacity", capacity)
            .with_detail("load", (load * 100.0).round() / 100.0)
    }
}

pub struct AnalyticsProbe(pub Arc<PopulationAnalytics>);

#[async_trait]
impl HealthProbe for AnalyticsProbe {
    fn component(&self) -> &'static str {
        "analytics"
    }

    async fn check(&self) -> ComponentHealth {
        ComponentHealth::new(self.component(), HealthStatus::Healthy)
            .with_detail("observations", self.0.len().await)
            .with_detail("k_threshold", self.0.k_threshold())
    }
}

pub struct HealthMonitorService {
    start_time: Instant,
    metrics_collector: Arc<MetricsCollectorService>,
    probes: Vec<Box<dyn HealthProbe>>,
}

impl HealthMonitorService {
    pub fn new(metrics_collector: Arc<MetricsCollectorService>, probes: Vec<Box<dyn HealthProbe>>) -> Self {
        Self {
            start_time: Instant::now(),
            metrics_collector,
            probes,
        }
    }

    pub fn metrics(&self) -> &Arc<MetricsCollectorService> {
        &self.metrics_collector
    }

    #[instrument(skip(self))]
    pub async fn check_all(&self) -> SystemHealth {
        let mut components = Vec::with_capacity(self.probes.len() + 1);
        components.push(self.check_http().await);
        for probe in &self.probes {
            components.push(probe.check().await);
        }

        let status = overall_status(&components);
        if status != HealthStatus::Healthy {
            warn!("System health is {:?}", status);
        } else {
            debug!("System healthy");
        }

        SystemHealth {
            status,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components,
            timestamp: chrono::Utc::now(),
        }
    }

    pub async fn check_component(&self, name: &str) -> Option<ComponentHealth> {
        if name == "http" {
            return Some(self.check_http().await);
        }
        for probe in &self.probes {
            if probe.component() == name {
                return Some(probe.check().await);
            }
        }
        None
    }

    async fn check_http(&self) -> ComponentHealth {
        let stats = self.metrics_collector.get_current_stats().await;
        let erroring = stats.total_requests >= MIN_REQUESTS_FOR_ERROR_RATE
            && stats.error_rate_percentage > ERROR_RATE_DEGRADED;
        let slow = stats.p95_response_time_ms > P95_DEGRADED_MS;

        let health = match (erroring, slow) {
            (true, _) => ComponentHealth::new("http", HealthStatus::Degraded)
                .with_message(format!("Error rate {:.1}%", stats.error_rate_percentage)),
            (false, true) => ComponentHealth::new("http", HealthStatus::Degraded)
                .with_message(format!("p95 response time {:.0} ms", stats.p95_response_time_ms)),
            (false, false) => ComponentHealth::new("http", HealthStatus::Healthy),
        };
        health
            .with_detail("total_requests", stats.total_requests)
            .with_detail("error_rate_percentage", stats.error_rate_percentage)
            .with_detail("p95_response_time_ms", stats.p95_response_time_ms)
    }
}

/// The worst component status.
fn overall_status(components: &[ComponentHealth]) -> HealthStatus {
    components
        .iter()
        .map(|c| c.status)
        .max()
        .unwrap_or(HealthStatus::Healthy)
}
