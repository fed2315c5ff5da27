use std::sync::Arc;

use axum::{routing::post, Router};

use ai_gateway_cell::AiServiceManager;

use crate::handlers;
use crate::services::SoapGenerator;

pub fn create_soap_router(ai: Arc<AiServiceManager>) -> Router {
    let generator = Arc::new(SoapGenerator::with_ai(ai));

    Router::new()
        .route("/generate", post(handlers::generate_soap_note))
        .with_state(generator)
}
