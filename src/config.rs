use crate::ai::AiConfig;
use crate::analytics::AnalyticsConfig;
use crate::search::SearchConfig;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EngineConfig {
    /// Retrieval and scoring configuration
    #[serde(default)]
    #[validate(nested)]
    pub search: SearchConfig,

    /// AI reranking configuration
    #[serde(default)]
    #[validate(nested)]
    pub ai: AiConfig,

    /// Query analytics configuration
    #[serde(default)]
    #[validate(nested)]
    pub analytics: AnalyticsConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl EngineConfig {
    /// Load configuration from the compiled-in defaults, an optional file and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("PRAYER_SEARCH_CONFIG")
            .unwrap_or_else(|_| "config/prayer-search.toml".to_string());

        let loaded: Self = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: PRAYER_SEARCH_)
            .add_source(
                config::Environment::with_prefix("PRAYER_SEARCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(loaded)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
