use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Query analytics configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyticsConfig {
    /// Record searches and clicks
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Sled directory for the snapshot; in-memory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Log capacity, oldest entries evicted first
    #[serde(default = "default_max_entries")]
    #[validate(range(min = 1))]
    pub max_entries: usize,

    /// Recent entries scanned when attributing a click
    #[serde(default = "default_click_window")]
    #[validate(range(min = 1))]
    pub click_window: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: None,
            max_entries: default_max_entries(),
            click_window: default_click_window(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_entries() -> usize {
    1000
}

fn default_click_window() -> usize {
    10
}
