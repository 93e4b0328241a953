//! AI reranking configuration

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration for the completion provider and the reranking stage
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AiConfig {
    /// Master switch; when off, semantic searches never reach the provider
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    #[validate(url)]
    pub base_url: String,

    #[serde(default = "default_model")]
    #[validate(length(min = 1))]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    #[validate(range(min = 1))]
    pub max_tokens: u32,

    /// Candidates enumerated in a rerank prompt
    #[serde(default = "default_max_prompt_candidates")]
    #[validate(range(min = 1))]
    pub max_prompt_candidates: usize,

    /// Translation characters shown per candidate
    #[serde(default = "default_translation_preview_chars")]
    pub translation_preview_chars: usize,

    /// Keyword candidates gathered before reranking
    #[serde(default = "default_candidate_pool")]
    #[validate(range(min = 1))]
    pub candidate_pool: usize,

    /// Maximum cached rerank judgments
    #[serde(default = "default_cache_capacity")]
    #[validate(range(min = 1))]
    pub cache_capacity: u64,

    /// Cached judgment lifetime (seconds)
    #[serde(default = "default_cache_ttl_secs")]
    #[validate(range(min = 1))]
    pub cache_ttl_secs: u64,

    /// Recent queries remembered for contextual prompts
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Recent queries included in a prompt
    #[serde(default = "default_context_in_prompt")]
    pub context_in_prompt: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_prompt_candidates: default_max_prompt_candidates(),
            translation_preview_chars: default_translation_preview_chars(),
            candidate_pool: default_candidate_pool(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl_secs(),
            context_window: default_context_window(),
            context_in_prompt: default_context_in_prompt(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_api_key_env() -> String {
    "PRAYER_SEARCH_AI_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_max_prompt_candidates() -> usize {
    20
}

fn default_translation_preview_chars() -> usize {
    150
}

fn default_candidate_pool() -> usize {
    20
}

fn default_cache_capacity() -> u64 {
    500
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_context_window() -> usize {
    5
}

fn default_context_in_prompt() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = AiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.context_window, 5);
        assert_eq!(config.context_in_prompt, 3);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = AiConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
