use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Groq,
    Gemini,
    OpenRouter,
    HuggingFace,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Groq,
        ProviderKind::Gemini,
        ProviderKind::OpenRouter,
        ProviderKind::HuggingFace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::HuggingFace => "huggingface",
        }
    }

    /// Providers whose chat endpoints accept inline images.
    pub fn supports_vision(&self) -> bool {
        matches!(self, ProviderKind::Gemini | ProviderKind::OpenRouter)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "huggingface" | "hf" => Ok(ProviderKind::HuggingFace),
            other => Err(format!("Unknown AI provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_keys: Vec<String>,
    pub model: String,
    pub base_url: String,
}

impl ProviderSettings {
    pub fn is_configured(&self) -> bool {
        !self.api_keys.is_empty() && !self.base_url.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub groq: ProviderSettings,
    pub gemini: ProviderSettings,
    pub gemini_vision_model: String,
    pub openrouter: ProviderSettings,
    pub huggingface: ProviderSettings,
    pub provider_order: Vec<ProviderKind>,
    pub ai_request_timeout_secs: u64,
    pub ai_cache_capacity: usize,
    pub ai_cache_ttl_secs: u64,
    pub usda_base_url: String,
    pub usda_api_key: String,
    pub openfoodfacts_base_url: String,
    pub session_capacity: usize,
    pub session_idle_timeout_mins: i64,
    pub k_anonymity_threshold: usize,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            groq: ProviderSettings {
                api_keys: key_list("GROQ_API_KEYS"),
                model: string_or("GROQ_MODEL", "llama-3.1-8b-instant"),
                base_url: string_or("GROQ_BASE_URL", "https://api.groq.com/openai/v1"),
            },
            gemini: ProviderSettings {
                api_keys: key_list("GEMINI_API_KEYS"),
                model: string_or("GEMINI_MODEL", "gemini-1.5-flash"),
                base_url: string_or(
                    "GEMINI_BASE_URL",
                    "https://generativelanguage.googleapis.com/v1beta",
                ),
            },
            gemini_vision_model: string_or("GEMINI_VISION_MODEL", "gemini-1.5-flash"),
            openrouter: ProviderSettings {
                api_keys: key_list("OPENROUTER_API_KEYS"),
                model: string_or("OPENROUTER_MODEL", "meta-llama/llama-3.1-8b-instruct"),
                base_url: string_or("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1"),
            },
            huggingface: ProviderSettings {
                api_keys: key_list("HUGGINGFACE_API_KEYS"),
                model: string_or("HUGGINGFACE_MODEL", "mistralai/Mistral-7B-Instruct-v0.3"),
                base_url: string_or(
                    "HUGGINGFACE_BASE_URL",
                    "https://api-inference.huggingface.co/models",
                ),
            },
            provider_order: env::var("AI_PROVIDER_ORDER")
                .map(|raw| parse_provider_order(&raw))
                .unwrap_or_else(|_| ProviderKind::ALL.to_vec()),
            ai_request_timeout_secs: parsed_or("AI_REQUEST_TIMEOUT_SECS", 30),
            ai_cache_capacity: parsed_or("AI_CACHE_CAPACITY", 256),
            ai_cache_ttl_secs: parsed_or("AI_CACHE_TTL_SECS", 3600),
            usda_base_url: string_or("USDA_BASE_URL", "https://api.nal.usda.gov/fdc/v1"),
            usda_api_key: string_or("USDA_API_KEY", "DEMO_KEY"),
            openfoodfacts_base_url: string_or(
                "OPENFOODFACTS_BASE_URL",
                "https://world.openfoodfacts.org",
            ),
            session_capacity: parsed_or("SESSION_CAPACITY", 1000),
            session_idle_timeout_mins: parsed_or("SESSION_IDLE_TIMEOUT_MINS", 60),
            k_anonymity_threshold: parsed_or("K_ANONYMITY_THRESHOLD", 5),
            server_port: parsed_or("SERVER_PORT", 3000),
        };

        if !config.is_ai_configured() {
            warn!("No AI provider keys configured - responses will use static fallbacks");
        }

        config
    }

    pub fn is_ai_configured(&self) -> bool {
        ProviderKind::ALL
            .iter()
            .any(|kind| self.provider(*kind).is_configured())
    }

    pub fn provider(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Groq => &self.groq,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenRouter => &self.openrouter,
            ProviderKind::HuggingFace => &self.huggingface,
        }
    }

    pub fn keys_for(&self, kind: ProviderKind) -> &[String] {
        &self.provider(kind).api_keys
    }
}

fn string_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: FromStr + fmt::Display + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} is not valid ({}), using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn key_list(name: &str) -> Vec<String> {
    match env::var(name) {
        Ok(raw) => split_keys(&raw),
        Err(_) => {
            warn!("{} not set, provider disabled", name);
            Vec::new()
        }
    }
}

pub fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_provider_order(raw: &str) -> Vec<ProviderKind> {
    let mut order = Vec::new();
    for name in raw.split(',').filter(|n| !n.trim().is_empty()) {
        match name.parse::<ProviderKind>() {
            Ok(kind) if !order.contains(&kind) => order.push(kind),
            Ok(_) => {}
            Err(e) => warn!("{}", e),
        }
    }
    if order.is_empty() {
        warn!("AI_PROVIDER_ORDER had no usable entries, using default order");
        return ProviderKind::ALL.to_vec();
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keys_drops_blank_entries() {
        assert_eq!(split_keys(" a, ,b,,c "), vec!["a", "b", "c"]);
        assert!(split_keys("").is_empty());
    }

    #[test]
    fn test_provider_order_deduplicates_and_skips_unknown() {
        let order = parse_provider_order("gemini, GROQ, gemini, bogus");
        assert_eq!(order, vec![ProviderKind::Gemini, ProviderKind::Groq]);
    }

    #[test]
    fn test_provider_order_falls_back_when_empty() {
        assert_eq!(parse_provider_order("bogus"), ProviderKind::ALL.to_vec());
    }

    #[test]
    fn test_provider_aliases() {
        assert_eq!("hf".parse::<ProviderKind>(), Ok(ProviderKind::HuggingFace));
        assert!("openai".parse::<ProviderKind>().is_err());
    }
}
