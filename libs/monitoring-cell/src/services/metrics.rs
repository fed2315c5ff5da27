// =====================================================================================
// METRICS COLLECTOR SERVICE
// =====================================================================================

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::RwLock;

use crate::models::{MetricsSnapshot, RouteStats};

/// Response times kept for the percentile.
const WINDOW: usize = 1000;

#[derive(Debug)]
pub struct MetricsCollectorService {
    request_count: AtomicU64,
    error_count: AtomicU64,
    total_response_time_ms: AtomicU64,
    response_times: RwLock<Vec<u64>>,
    routes: RwLock<HashMap<String, RouteStats>>,
    start_time: Instant,
}

impl Default for MetricsCollectorService {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollectorService {
    pub fn new() -> Self {
        Self {
            request_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            total_response_time_ms: AtomicU64::new(0),
            response_times: RwLock::new(Vec::new()),
            routes: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    pub async fn record_request(&self, route: &str, response_time_ms: u64, is_error: bool) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.total_response_time_ms.fetch_add(response_time_ms, Ordering::Relaxed);
        if is_error {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }

        {
            let mut routes = self.routes.write().await;
            let stats = routes.entry(route.to_string()).or_default();
            stats.requests += 1;
            if is_error {
                stats.errors += 1;
            }
        }

        let mut times = self.response_times.write().await;
        times.push(response_time_ms);
        if times.len() > WINDOW {
            // drop the oldest half
            times.drain(0..WINDOW / 2);
        }
    }

    pub async fn get_current_stats(&self) -> MetricsSnapshot {
        let total_requests = self.request_count.load(Ordering::Relaxed);
        let total_errors = self.error_count.load(Ordering::Relaxed);
        let total_response_time = self.total_response_time_ms.load(Ordering::Relaxed);
        let uptime = self.start_time.elapsed().as_secs();

        let requests_per_second = if uptime > 0 {
            total_requests as f64 / uptime as f64
        } else {
            0.0
        };

        let (average_response_time_ms, error_rate_percentage) = if total_requests > 0 {
            (
                total_response_time as f64 / total_requests as f64,
                (total_errors as f64 / total_requests as f64) * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        let p95_response_time_ms = {
            let mut sorted = self.response_times.read().await.clone();
            sorted.sort_unstable();
            percentile(&sorted, 0.95)
        };

        let routes: BTreeMap<String, RouteStats> = self
            .routes
            .read()
            .await
            .iter()
            .map(|(route, stats)| (route.clone(), *stats))
            .collect();

        MetricsSnapshot {
            requests_per_second,
            average_response_time_ms,
            p95_response_time_ms,
            error_rate_percentage,
            total_requests,
            total_errors,
            uptime_seconds: uptime,
            routes,
        }
    }
}

/// Nearest-rank percentile of an ascending slice.
fn percentile(sorted: &[u64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1] as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_and_rates() {
        let metrics = MetricsCollectorService::new();
        metrics.record_request("POST /conversations", 10, false).await;
        metrics.record_request("POST /conversations", 30, false).await;
        metrics.record_request("GET /monitoring/health", 20, true).await;

        let stats = metrics.get_current_stats().await;
        assert_eq!(stats.total_requests, 3);
        assert_eq!(stats.total_errors, 1);
        assert_eq!(stats.average_response_time_ms, 20.0);
        assert!((stats.error_rate_percentage - 33.333).abs() < 0.01);
        assert_eq!(stats.routes["POST /conversations"].requests, 2);
        assert_eq!(stats.routes["GET /monitoring/health"].errors, 1);
    }

    #[tokio::test]
    async fn test_p95() {
        let metrics = MetricsCollectorService::new();
        for ms in 1..=100 {
            metrics.record_request("GET /", ms, false).await;
        }
        assert_eq!(metrics.get_current_stats().await.p95_response_time_ms, 95.0);
    }

    #[tokio::test]
    async fn test_window_is_bounded() {
        let metrics = MetricsCollectorService::new();
        for _ in 0..=WINDOW {
            metrics.record_request("GET /", 1, false).await;
        }
        assert_eq!(metrics.response_times.read().await.len(), WINDOW / 2 + 1);
        assert_eq!(metrics.get_current_stats().await.total_requests, WINDOW as u64 + 1);
    }

    #[test]
    fn test_percentile_edges() {
        assert_eq!(percentile(&[], 0.95), 0.0);
        assert_eq!(percentile(&[7], 0.95), 7.0);
    }
}
