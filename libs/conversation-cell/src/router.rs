use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::ChatService;

pub fn create_conversation_router(chat: Arc<ChatService>) -> Router {
    Router::new()
        .route("/", post(handlers::start_conversation))
        .route(
            "/{id}",
            get(handlers::get_conversation).delete(handlers::end_conversation),
        )
        .route("/{id}/messages", post(handlers::send_message))
        .route("/{id}/soap", post(handlers::generate_conversation_soap))
        .with_state(chat)
}
