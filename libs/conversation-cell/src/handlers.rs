use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;
use uuid::Uuid;

use crate::models::{
    ChatReply, ConversationError, ConversationSoapResponse, ConversationSummary, SendMessageRequest,
    SoapQuery, StartConversationRequest, StartConversationResponse,
};
use crate::services::ChatService;

#[instrument(skip_all)]
pub async fn start_conversation(
    State(chat): State<Arc<ChatService>>,
    Json(request): Json<StartConversationRequest>,
) -> (StatusCode, Json<StartConversationResponse>) {
    let session = chat.start(request.patient).await;
    let greeting = session
        .messages
        .first()
        .map(|m| m.text.clone())
        .unwrap_or_default();
    (
        StatusCode::CREATED,
        Json(StartConversationResponse { session_id: session.id, greeting }),
    )
}

pub async fn get_conversation(
    State(chat): State<Arc<ChatService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationSummary>, ConversationError> {
    Ok(Json(chat.summary(id).await?))
}

#[instrument(skip_all, fields(session_id = %id))]
pub async fn send_message(
    State(chat): State<Arc<ChatService>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ChatReply>, ConversationError> {
    Ok(Json(chat.handle_message(id, &request.text).await?))
}

#[instrument(skip_all, fields(session_id = %id, enhance = query.enhance))]
pub async fn generate_conversation_soap(
    State(chat): State<Arc<ChatService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<SoapQuery>,
) -> Result<Json<ConversationSoapResponse>, ConversationError> {
    let note = chat.generate_soap(id, query.enhance).await?;
    let text = note.to_text();
    Ok(Json(ConversationSoapResponse { note, text }))
}

pub async fn end_conversation(
    State(chat): State<Arc<ChatService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationSummary>, ConversationError> {
    Ok(Json(chat.end(id).await?))
}
