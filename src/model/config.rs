use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Which backing holds the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backing {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backing: Backing,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the document collection service
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Interval between snapshot refetches on the sync worker
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            base_url: String::new(),
            timeout_ms: default_timeout_ms(),
            refresh_ms: default_refresh_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_refresh_ms() -> u64 {
    3_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long the splash screen stays up before the home screen
    #[serde(default = "default_splash_ms")]
    pub splash_ms: u64,
    /// Delay between tapping a checkbox and committing the completion,
    /// during which a second tap cancels
    #[serde(default = "default_commit_delay_ms")]
    pub commit_delay_ms: u64,
    /// Hex color overrides, keyed by theme slot name
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            splash_ms: default_splash_ms(),
            commit_delay_ms: default_commit_delay_ms(),
            colors: HashMap::new(),
        }
    }
}

fn default_splash_ms() -> u64 {
    1_000
}

fn default_commit_delay_ms() -> u64 {
    1_200
}
