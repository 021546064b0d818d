use crate::cache::ResponseCache;
use crate::error::ChopsmoError;
use crate::ingredients::IngredientNormalizer;
use crate::model::{RecipeDetail, RecipeSummary};
use crate::recipes::{recipe_from_payload, summaries_from_payload};
use crate::requests::{Fetched, RequestTracker};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use serde_json::Value;
use std::sync::Arc;

const SEARCH_SCOPE: &str = "search";

/// Client for the recipe REST backend.
///
/// Responses are cached by request URL in a shared [`ResponseCache`];
/// normalization runs on every read so cached payloads stay raw.
#[derive(Debug, Clone)]
pub struct RecipeClient {
    http: Client,
    base_url: Url,
    cache: Arc<ResponseCache>,
    normalizer: Arc<IngredientNormalizer>,
    tracker: Arc<RequestTracker>,
}

impl RecipeClient {
    pub(crate) fn new(
        http: Client,
        base_url: Url,
        cache: Arc<ResponseCache>,
        normalizer: Arc<IngredientNormalizer>,
    ) -> Self {
        Self {
            http,
            base_url,
            cache,
            normalizer,
            tracker: Arc::new(RequestTracker::new()),
        }
    }

    /// Build the default headers for backend requests
    pub(crate) fn default_headers(token: Option<&str>) -> Result<HeaderMap, ChopsmoError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Token {token}"))
                .map_err(|e| ChopsmoError::BuilderError(format!("Invalid API token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch a recipe by id and normalize its ingredients
    pub async fn fetch_recipe(&self, id: &str) -> Result<RecipeDetail, ChopsmoError> {
        let url = self.endpoint(&format!("recipes/{id}/"), &[])?;
        let payload = self.get_json(&url).await?;
        let recipe = recipe_from_payload(&payload, id, &self.normalizer);
        info!(
            "Loaded recipe '{}' with {} ingredients",
            recipe.title,
            recipe.ingredients.len()
        );
        Ok(recipe)
    }

    /// Search recipes.
    ///
    /// Every call supersedes the searches started before it. If another
    /// search starts while this one is in flight, the result comes back as
    /// [`Fetched::Superseded`] and is not cached.
    pub async fn search_recipes(
        &self,
        query: &str,
    ) -> Result<Fetched<Vec<RecipeSummary>>, ChopsmoError> {
        let ticket = self.tracker.begin(SEARCH_SCOPE);
        let url = self.endpoint("recipes/", &[("search", query)])?;

        if let Some(payload) = self.cache.get(url.as_str()) {
            debug!("Cache hit for {}", url);
            return Ok(self.tracker.settle(&ticket, summaries_from_payload(&payload)));
        }

        let payload = self.request(&url).await?;
        if !self.tracker.is_current(&ticket) {
            debug!(
                "Search '{}' (generation {}) was superseded",
                query,
                ticket.generation()
            );
            return Ok(Fetched::Superseded);
        }

        self.cache.put_default(url.as_str(), payload.clone());
        Ok(Fetched::Current(summaries_from_payload(&payload)))
    }

    /// Drop the cached detail response for a recipe
    pub fn invalidate_recipe(&self, id: &str) {
        if let Ok(url) = self.endpoint(&format!("recipes/{id}/"), &[]) {
            self.cache.invalidate(url.as_str());
        }
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ChopsmoError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ChopsmoError::InvalidUrl(format!("{path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// GET `url` as JSON, serving from and filling the cache
    async fn get_json(&self, url: &Url) -> Result<Value, ChopsmoError> {
        if let Some(payload) = self.cache.get(url.as_str()) {
            debug!("Cache hit for {}", url);
            return Ok(payload);
        }

        let payload = self.request(url).await?;
        self.cache.put_default(url.as_str(), payload.clone());
        Ok(payload)
    }

    async fn request(&self, url: &Url) -> Result<Value, ChopsmoError> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(ChopsmoError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChopsmoError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(ChopsmoError::from_transport)?;
        Ok(serde_json::from_str(&body)?)
    }
}
