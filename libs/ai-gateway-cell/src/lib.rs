// =====================================================================================
// AI GATEWAY CELL - MULTI-VENDOR LLM ROUTING
// =====================================================================================
//
// Routes text and vision generation to Groq, Gemini, OpenRouter or Hugging Face:
// - key rotation per vendor with cool-down for rejected keys
// - circuit breaker per vendor and sequential fallback in configured order
// - LRU/TTL response cache for repeated prompts
// - nutrition, goal and food-suggestion planners with static fallbacks
//
// =====================================================================================

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::AiGatewayError;
pub use models::{ImageInput, LlmRequest, LlmResponse, ResultSource};
pub use router::create_ai_router;
pub use services::{AiServiceManager, LlmProvider, NutritionAdvisor, ProviderError};
