// =====================================================================================
// INTENT CELL - CONVERSATION INTENT PREDICTION
// =====================================================================================
//
// Three small text classifiers trained at startup on a labelled utterance
// corpus, combined by weighted soft voting, plus a first-order model of how
// intents follow each other within a conversation.
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Intent, IntentPrediction, TurnContext};
pub use router::create_intent_router;
pub use services::{IntentPredictionModel, PredictiveIntentEngine};
