use serde::{Deserialize, Serialize};

/// Name used when an ingredient's name cannot be resolved
pub const UNNAMED_INGREDIENT: &str = "Unnamed Ingredient";

/// Name of the record shown when a recipe has no usable ingredients
pub const INGREDIENTS_UNAVAILABLE: &str = "Ingredients not available";

/// A single ingredient in normalized form.
///
/// Absent parts are empty strings rather than `None` so the record
/// serializes to the same shape the front-end templates consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRecord {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub preparation: String,
}

impl Default for IngredientRecord {
    fn default() -> Self {
        Self::named(UNNAMED_INGREDIENT)
    }
}

impl IngredientRecord {
    /// Record with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: String::new(),
            unit: String::new(),
            preparation: String::new(),
        }
    }

    /// Placeholder record for recipes whose ingredients could not be read
    pub fn unavailable() -> Self {
        Self::named(INGREDIENTS_UNAVAILABLE)
    }

    /// Combined quantity and unit, e.g. `"1 tsp"`.
    ///
    /// Falls back to the bare quantity when there is no unit and to an
    /// empty string when there is no quantity.
    pub fn amount(&self) -> String {
        match (self.quantity.is_empty(), self.unit.is_empty()) {
            (false, false) => format!("{} {}", self.quantity, self.unit),
            (false, true) => self.quantity.clone(),
            _ => String::new(),
        }
    }

    /// One-line human readable form: `"2 cups flour, sifted"`
    pub fn display(&self) -> String {
        let amount = self.amount();
        let mut line = if amount.is_empty() {
            self.name.clone()
        } else {
            format!("{amount} {}", self.name)
        };
        if !self.preparation.is_empty() {
            line.push_str(", ");
            line.push_str(&self.preparation);
        }
        line
    }
}

/// Substitute the placeholder record when nothing could be normalized
pub fn ingredients_or_placeholder(records: Vec<IngredientRecord>) -> Vec<IngredientRecord> {
    if records.is_empty() {
        vec![IngredientRecord::unavailable()]
    } else {
        records
    }
}

/// A recipe as returned by the detail endpoint, with normalized ingredients
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeDetail {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub servings: Option<String>,
    pub ingredients: Vec<IngredientRecord>,
    pub instructions: Vec<String>,
}

/// A recipe entry from the list/search endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
}
