// =====================================================================================
// LLM VENDOR CLIENTS
// =====================================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};

use shared_config::{AppConfig, ProviderKind, ProviderSettings};

use crate::models::LlmRequest;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response payload: {0}")]
    Malformed(String),

    #[error("image input not supported")]
    VisionUnsupported,
}

impl ProviderError {
    /// Auth and quota rejections are tied to the key, not the vendor.
    pub fn is_key_rejection(&self) -> bool {
        matches!(self, ProviderError::Status { status, .. } if matches!(status, 401 | 403 | 429))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn model(&self) -> &str;

    fn supports_vision(&self) -> bool {
        self.kind().supports_vision()
    }

    async fn complete(&self, request: &LlmRequest, api_key: &str) -> Result<String, ProviderError>;
}

/// Builds one client per configured vendor in the configured order.
pub fn providers_from_config(config: &AppConfig) -> Vec<Box<dyn LlmProvider>> {
    let http_client = Client::builder()
        .timeout(Duration::from_secs(config.ai_request_timeout_secs.max(1)))
        .build()
        .unwrap_or_else(|e| {
            error!("Falling back to default HTTP client: {}", e);
            Client::new()
        });

    config
        .provider_order
        .iter()
        .filter(|kind| config.provider(**kind).is_configured())
        .map(|kind| -> Box<dyn LlmProvider> {
            let settings = config.provider(*kind);
            match kind {
                ProviderKind::Groq | ProviderKind::OpenRouter => Box::new(
                    OpenAiCompatibleProvider::new(*kind, settings, http_client.clone()),
                ),
                ProviderKind::Gemini => Box::new(GeminiProvider::new(
                    settings,
                    &config.gemini_vision_model,
                    http_client.clone(),
                )),
                ProviderKind::HuggingFace => {
                    Box::new(HuggingFaceProvider::new(settings, http_client.clone()))
                }
            }
        })
        .collect()
}

async fn read_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ProviderError::Status { status, body }
}

// -------------------------------------------------------------------------------------
// OpenAI-compatible chat completions (Groq, OpenRouter)
// -------------------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: Option<String>,
}

pub struct OpenAiCompatibleProvider {
    kind: ProviderKind,
    base_url: String,
    model: String,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(kind: ProviderKind, settings: &ProviderSettings, client: Client) -> Self {
        Self {
            kind,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            client,
        }
    }

    fn build_body(&self, request: &LlmRequest) -> ChatRequest<'_> {
        let user_content = match &request.image {
            Some(image) => json!([
                { "type": "text", "text": request.prompt },
                { "type": "image_url", "image_url": { "url": image.data_url() } }
            ]),
            None => Value::String(request.prompt.clone()),
        };

        let mut messages = Vec::with_capacity(2);
        if !request.system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: Value::String(request.system.clone()),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user_content,
        });

        ChatRequest {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request
                .json_mode
                .then(|| json!({ "type": "json_object" })),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &LlmRequest, api_key: &str) -> Result<String, ProviderError> {
        if request.image.is_some() && !self.supports_vision() {
            return Err(ProviderError::VisionUnsupported);
        }

        let url = format!("{}/chat/completions", self.base_url);
        debug!("Calling {} at {}", self.kind, url);

        let mut builder = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", api_key))
            .header(header::CONTENT_TYPE, "application/json");
        if self.kind == ProviderKind::OpenRouter {
            builder = builder.header("X-Title", "Medical Chat Assistant");
        }

        let response = builder.json(&self.build_body(request)).send().await?;
        if !response.status().is_success() {
            return Err(read_error(response).await);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::Malformed("no choices in response".to_string()))
    }
}

// -------------------------------------------------------------------------------------
// Gemini generateContent
// -------------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

pub struct GeminiProvider {
    base_url: String,
    model: String,
    vision_model: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(settings: &ProviderSettings, vision_model: &str, client: Client) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            vision_model: vision_model.to_string(),
            client,
        }
    }

    fn build_body(request: &LlmRequest) -> Value {
        let mut parts = vec![json!({ "text": request.prompt })];
        if let Some(image) = &request.image {
            parts.push(json!({
                "inline_data": { "mime_type": image.mime_type, "data": image.data }
            }));
        }

        let mut generation_config = json!({
            "temperature": request.temperature,
            "maxOutputTokens": request.max_tokens,
        });
        if request.json_mode {
            generation_config["responseMimeType"] = json!("application/json");
        }

        let mut body = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": generation_config,
        });
        if !request.system.is_empty() {
            body["systemInstruction"] = json!({ "parts": [{ "text": request.system }] });
        }
        body
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &LlmRequest, api_key: &str) -> Result<String, ProviderError> {
        let model = if request.image.is_some() {
            &self.vision_model
        } else {
            &self.model
        };
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!("Calling gemini model {}", model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&Self::build_body(request))
            .send()
            .await?;

        if response.status() == StatusCode::BAD_REQUEST {
            // Gemini reports invalid keys as 400 with API_KEY_INVALID.
            let body = response.text().await.unwrap_or_default();
            let status = if body.contains("API_KEY_INVALID") { 401 } else { 400 };
            return Err(ProviderError::Status { status, body });
        }
        if !response.status().is_success() {
            return Err(read_error(response).await);
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProviderError::Malformed("no candidate text".to_string()))?;

        Ok(text)
    }
}

// -------------------------------------------------------------------------------------
// Hugging Face inference API
// -------------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct HfGeneration {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HfResponse {
    Many(Vec<HfGeneration>),
    One(HfGeneration),
}

pub struct HuggingFaceProvider {
    base_url: String,
    model: String,
    client: Client,
}

impl HuggingFaceProvider {
    pub fn new(settings: &ProviderSettings, client: Client) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            client,
        }
    }

    /// Instruction-tuned models on the inference API take a single prompt string.
    fn format_prompt(request: &LlmRequest) -> String {
        if request.system.is_empty() {
            format!("<s>[INST] {} [/INST]", request.prompt)
        } else {
            format!("<s>[INST] {}\n\n{} [/INST]", request.system, request.prompt)
        }
    }
}

#[async_trait]
impl LlmProvider for HuggingFaceProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &LlmRequest, api_key: &str) -> Result<String, ProviderError> {
        if request.image.is_some() {
            return Err(ProviderError::VisionUnsupported);
        }

        let url = format!("{}/{}", self.base_url, self.model);
        let body = json!({
            "inputs": Self::format_prompt(request),
            "parameters": {
                "max_new_tokens": request.max_tokens,
                "temperature": request.temperature.max(0.01),
                "return_full_text": false
            },
            "options": { "wait_for_model": true }
        });

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(read_error(response).await);
        }

        let parsed: HfResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let text = match parsed {
            HfResponse::Many(items) => items.into_iter().next().map(|g| g.generated_text),
            HfResponse::One(item) => Some(item.generated_text),
        };
        text.map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProviderError::Malformed("empty generation".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageInput;

    #[test]
    fn test_key_rejection_statuses() {
        let status = |s| ProviderError::Status { status: s, body: String::new() };
        assert!(status(401).is_key_rejection());
        assert!(status(429).is_key_rejection());
        assert!(!status(500).is_key_rejection());
        assert!(!ProviderError::Transport("x".into()).is_key_rejection());
    }

    #[test]
    fn test_openai_body_includes_json_format_and_image_parts() {
        let settings = ProviderSettings {
            api_keys: vec!["k".into()],
            model: "m".into(),
            base_url: "http://x/".into(),
        };
        let provider = OpenAiCompatibleProvider::new(ProviderKind::OpenRouter, &settings, Client::new());
        let request = LlmRequest::new("sys", "what is this")
            .json()
            .with_image(ImageInput::from_base64("AAAA", "image/png"));

        let body = serde_json::to_value(provider.build_body(&request)).unwrap();
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"][1]["image_url"]["url"], "data:image/png;base64,AAAA");
        assert_eq!(provider.base_url, "http://x");
    }

    #[test]
    fn test_gemini_body_shape() {
        let request = LlmRequest::new("be brief", "hi").json();
        let body = GeminiProvider::build_body(&request);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_hf_prompt_format() {
        let request = LlmRequest::new("", "hello");
        assert_eq!(HuggingFaceProvider::format_prompt(&request), "<s>[INST] hello [/INST]");
    }
}
