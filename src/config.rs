use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChopsmoConfig {
    /// Backend connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Ingredient normalizer vocabulary extensions
    #[serde(default)]
    pub normalizer: NormalizerConfig,
}

/// Configuration for the REST backend
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the API, e.g. "https://api.chopsmo.example/api/"
    pub base_url: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Auth token sent as `Authorization: Token <token>`
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout(),
            token: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration for the local response cache
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Whether responses are cached at all
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Time-to-live for cached responses in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Extra vocabulary for the ingredient normalizer
#[derive(Debug, Deserialize, Clone, Default)]
pub struct NormalizerConfig {
    /// Units recognized in addition to the built-in ones (singular form)
    #[serde(default)]
    pub extra_units: Vec<String>,
    /// Words that mark a free-text line as an ingredient
    #[serde(default)]
    pub extra_ingredient_words: Vec<String>,
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_cache_enabled() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    300
}

impl ChopsmoConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with CHOPSMO__ prefix
    /// 2. chopsmo.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: CHOPSMO__API__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config("chopsmo")
    }
}

/// Load configuration from the named file (extension optional) and environment variables
pub fn load_config(file: &str) -> Result<ChopsmoConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name(file).required(false))
        // Use double underscore for nested: CHOPSMO__CACHE__TTL_SECS
        .add_source(
            Environment::with_prefix("CHOPSMO")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("normalizer.extra_units")
                .with_list_parse_key("normalizer.extra_ingredient_words")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
