// =====================================================================================
// CONVERSATION CELL - PATIENT CHAT ORCHESTRATION
// =====================================================================================
//
// Holds one in-memory session per patient conversation. Each message is
// classified, the accumulated symptoms are re-assessed, and the reply comes
// from the AI gateway with a canned fallback. Emergencies bypass the model.
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{ChatReply, ConversationError, ConversationSession, ReplySource};
pub use router::create_conversation_router;
pub use services::{ChatService, SessionStore};
