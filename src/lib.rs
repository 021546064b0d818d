//! Recipe core for the ChopSmo meal-planning client.
//!
//! Normalizes loosely structured ingredient data from the recipe backend,
//! caches backend responses with per-entry expiry, and assembles grocery
//! lists from normalized recipes.

pub mod builder;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod grocery;
pub mod ingredients;
pub mod model;
pub mod recipes;
pub mod requests;

// Re-export commonly used types
pub use builder::RecipeClientBuilder;
pub use cache::{CacheStats, ResponseCache};
pub use client::RecipeClient;
pub use config::ChopsmoConfig;
pub use error::ChopsmoError;
pub use grocery::{GroceryItem, GroceryList};
pub use ingredients::{normalize, IngredientNormalizer, RawIngredients};
pub use model::{ingredients_or_placeholder, IngredientRecord, RecipeDetail, RecipeSummary};
pub use requests::{Fetched, RequestTracker};

/// Fetch a recipe using configuration from `chopsmo.toml` and the environment
///
/// # Example
/// ```no_run
/// # use chopsmo_recipes::fetch_recipe;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipe = fetch_recipe("42").await?;
/// println!("{}", recipe.title);
/// # Ok(())
/// # }
/// ```
pub async fn fetch_recipe(id: &str) -> Result<RecipeDetail, ChopsmoError> {
    let config = ChopsmoConfig::load()?;
    let client = RecipeClientBuilder::from_config(&config).build()?;
    client.fetch_recipe(id).await
}

/// Normalize ingredients and substitute the placeholder when none were found
pub fn normalize_for_display(raw: &serde_json::Value) -> Vec<IngredientRecord> {
    ingredients_or_placeholder(normalize(raw))
}
