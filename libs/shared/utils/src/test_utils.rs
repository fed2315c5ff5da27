use shared_config::{AppConfig, ProviderKind, ProviderSettings};

/// Builds configurations for tests, with every outbound URL pointed at a
/// single mock server.
pub struct TestConfig {
    pub mock_base_url: String,
    pub providers: Vec<ProviderKind>,
    pub api_keys: Vec<String>,
    pub k_anonymity_threshold: usize,
    pub session_capacity: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            mock_base_url: "http://127.0.0.1:9".to_string(),
            providers: Vec::new(),
            api_keys: vec!["test-key-1".to_string(), "test-key-2".to_string()],
            k_anonymity_threshold: 3,
            session_capacity: 16,
        }
    }
}

impl TestConfig {
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            mock_base_url: uri.to_string(),
            ..Self::default()
        }
    }

    /// Enables the given providers with the configured test keys.
    pub fn with_providers(mut self, providers: &[ProviderKind]) -> Self {
        self.providers = providers.to_vec();
        self
    }

    fn settings(&self, kind: ProviderKind, model: &str) -> ProviderSettings {
        let enabled = self.providers.contains(&kind);
        ProviderSettings {
            api_keys: if enabled { self.api_keys.clone() } else { Vec::new() },
            model: model.to_string(),
            base_url: format!("{}/{}", self.mock_base_url, kind.as_str()),
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            groq: self.settings(ProviderKind::Groq, "test-groq-model"),
            gemini: self.settings(ProviderKind::Gemini, "test-gemini-model"),
            gemini_vision_model: "test-gemini-vision".to_string(),
            openrouter: self.settings(ProviderKind::OpenRouter, "test-openrouter-model"),
            huggingface: self.settings(ProviderKind::HuggingFace, "test-hf-model"),
            provider_order: if self.providers.is_empty() {
                ProviderKind::ALL.to_vec()
            } else {
                self.providers.clone()
            },
            ai_request_timeout_secs: 5,
            ai_cache_capacity: 32,
            ai_cache_ttl_secs: 60,
            usda_base_url: format!("{}/usda", self.mock_base_url),
            usda_api_key: "test-usda-key".to_string(),
            openfoodfacts_base_url: format!("{}/off", self.mock_base_url),
            session_capacity: self.session_capacity,
            session_idle_timeout_mins: 60,
            k_anonymity_threshold: self.k_anonymity_threshold,
            server_port: 0,
        }
    }
}

/// Canned vendor payloads for mock servers.
pub struct MockLlmResponses;

impl MockLlmResponses {
    pub fn chat_completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    pub fn gemini(content: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": content }] },
                "finishReason": "STOP"
            }]
        })
    }

    pub fn huggingface(content: &str) -> serde_json::Value {
        serde_json::json!([{ "generated_text": content }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_listed_providers_get_keys() {
        let config = TestConfig::with_mock_server("http://mock")
            .with_providers(&[ProviderKind::Gemini])
            .to_app_config();

        assert!(config.gemini.is_configured());
        assert!(!config.groq.is_configured());
        assert_eq!(config.gemini.base_url, "http://mock/gemini");
        assert_eq!(config.provider_order, vec![ProviderKind::Gemini]);
    }
}
