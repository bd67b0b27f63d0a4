use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Catalog client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog API key. Without one, searches use the offline suggestions.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (default: "https://api.curseforge.com/v1")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Game whose modpacks are searched (default: 432, Minecraft)
    #[serde(default = "default_game_id")]
    pub game_id: u32,
    /// Modpack category within the game (default: 4471)
    #[serde(default = "default_category_id")]
    pub category_id: u32,
    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long responses stay cached, in seconds (default: 300)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Outbound request limit
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Sliding-window request limit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window (default: 100)
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
    /// Window length in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_base_url() -> String {
    "https://api.curseforge.com/v1".to_string()
}

fn default_game_id() -> u32 {
    432
}

fn default_category_id() -> u32 {
    4471
}

fn default_user_agent() -> String {
    "ContainerCraft/1.0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_max_requests() -> usize {
    100
}

fn default_window_secs() -> u64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            game_id: default_game_id(),
            category_id: default_category_id(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and CLI arguments
    pub fn load(config_path: Option<&PathBuf>, cli_api_key: Option<&str>) -> anyhow::Result<Self> {
        // Start with default config
        let mut config = if let Some(path) = config_path {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            // Try default config file
            if let Ok(content) = std::fs::read_to_string("craftcatalog.toml") {
                toml::from_str(&content)?
            } else {
                Config::default()
            }
        };

        // Override with environment variables
        if let Ok(key) = std::env::var("CURSEFORGE_API_KEY") {
            config.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("CRAFTCATALOG_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(timeout) = std::env::var("CRAFTCATALOG_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                config.timeout_secs = t;
            }
        }

        // Override with CLI arguments
        if let Some(key) = cli_api_key {
            config.api_key = Some(key.to_string());
        }

        Ok(config.normalized())
    }

    /// Same configuration with a credential.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self.normalized()
    }

    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit.window_secs)
    }

    fn normalized(mut self) -> Self {
        if self.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            self.api_key = None;
        }
        self
    }
}
