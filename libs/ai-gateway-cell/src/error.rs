use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use shared_config::ProviderKind;

#[derive(Debug, Clone, Serialize)]
pub struct ProviderFailure {
    pub provider: ProviderKind,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum AiGatewayError {
    #[error("No AI provider available: {0}")]
    NoProviderAvailable(String),

    #[error("All AI providers failed: {}", summarize(.0))]
    AllProvidersFailed(Vec<ProviderFailure>),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Could not interpret model output: {0}")]
    UnparseableOutput(String),
}

fn summarize(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.provider, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

impl IntoResponse for AiGatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            AiGatewayError::NoProviderAvailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AiGatewayError::AllProvidersFailed(_) => StatusCode::BAD_GATEWAY,
            AiGatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AiGatewayError::UnparseableOutput(_) => StatusCode::BAD_GATEWAY,
        };

        tracing::error!("AI gateway error: {}: {}", status, self);

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
