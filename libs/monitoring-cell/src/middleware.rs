use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::services::MetricsCollectorService;

/// Records timing and outcome of every request under its route pattern.
pub async fn track_metrics(
    State(metrics): State<Arc<MetricsCollectorService>>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let route = format!("{} {}", request.method(), path);

    let response = next.run(request).await;

    let elapsed = started.elapsed().as_millis() as u64;
    metrics
        .record_request(&route, elapsed, response.status().is_server_error())
        .await;
    response
}
