use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};

use crate::cache::ResponseCache;
use crate::client::RecipeClient;
use crate::config::ChopsmoConfig;
use crate::error::ChopsmoError;
use crate::ingredients::IngredientNormalizer;

const USER_AGENT: &str = "chopsmo-recipes/0.1";

/// Builder for configuring a [`RecipeClient`]
#[derive(Debug, Default)]
pub struct RecipeClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    token: Option<String>,
    cache_ttl: Option<Duration>,
    cache: Option<Arc<ResponseCache>>,
    normalizer: Option<IngredientNormalizer>,
}

impl RecipeClientBuilder {
    /// Set the base URL of the backend API
    ///
    /// # Example
    /// ```
    /// use chopsmo_recipes::RecipeClient;
    ///
    /// let builder = RecipeClient::builder()
    ///     .base_url("https://api.example.com/api/");
    /// ```
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use chopsmo_recipes::RecipeClient;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeClient::builder()
    ///     .base_url("https://api.example.com/api/")
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the API token sent with every request
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the TTL of a cache created by the builder
    ///
    /// Ignored when an explicit cache is supplied with [`cache`](Self::cache).
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Share an existing cache with this client
    pub fn cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use a normalizer with a custom vocabulary
    pub fn normalizer(mut self, normalizer: IngredientNormalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Start from loaded configuration; later builder calls override it
    pub fn from_config(config: &ChopsmoConfig) -> Self {
        let cache = if config.cache.enabled {
            ResponseCache::new(config.cache.ttl())
        } else {
            ResponseCache::disabled()
        };

        Self {
            base_url: config.api.base_url.clone(),
            timeout: Some(config.api.timeout()),
            token: config.api.token.clone(),
            cache_ttl: None,
            cache: Some(Arc::new(cache)),
            normalizer: Some(IngredientNormalizer::from_config(&config.normalizer)),
        }
    }

    /// Build the client
    ///
    /// # Errors
    /// Returns `ChopsmoError` if:
    /// - No base URL was specified
    /// - The base URL cannot be parsed
    /// - The HTTP client cannot be created
    pub fn build(self) -> Result<RecipeClient, ChopsmoError> {
        let base_url = self.base_url.ok_or_else(|| {
            ChopsmoError::BuilderError(
                "No base URL specified. Use .base_url() or set CHOPSMO__API__BASE_URL".to_string(),
            )
        })?;
        let base_url = parse_base_url(&base_url)?;

        let http = Client::builder()
            .timeout(self.timeout.unwrap_or(Duration::from_secs(30)))
            .user_agent(USER_AGENT)
            .default_headers(RecipeClient::default_headers(self.token.as_deref())?)
            .build()?;

        let cache = match (self.cache, self.cache_ttl) {
            (Some(cache), _) => cache,
            (None, Some(ttl)) => Arc::new(ResponseCache::new(ttl)),
            (None, None) => Arc::new(ResponseCache::default()),
        };

        Ok(RecipeClient::new(
            http,
            base_url,
            cache,
            Arc::new(self.normalizer.unwrap_or_default()),
        ))
    }
}

/// Parse the base URL, making sure relative joins stay under its path
fn parse_base_url(raw: &str) -> Result<Url, ChopsmoError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).map_err(|e| ChopsmoError::InvalidUrl(format!("{raw}: {e}")))
}

impl RecipeClient {
    /// Creates a new builder for the backend client
    ///
    /// # Example
    /// ```
    /// use chopsmo_recipes::RecipeClient;
    ///
    /// let builder = RecipeClient::builder();
    /// ```
    pub fn builder() -> RecipeClientBuilder {
        RecipeClientBuilder::default()
    }
}
