//! Grocery list assembled from the ingredients of several recipes.

use crate::ingredients::UnitVocabulary;
use crate::model::{IngredientRecord, RecipeDetail, INGREDIENTS_UNAVAILABLE, UNNAMED_INGREDIENT};
use serde::Serialize;
use std::collections::HashMap;

/// One line of a grocery list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroceryItem {
    pub name: String,
    pub quantity: String,
    pub unit: String,
    /// Recipes that need this item, in the order they were added
    pub recipes: Vec<String>,
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    unit: String,
    quantities: Vec<String>,
    recipes: Vec<String>,
}

/// Merges ingredient records by name and unit
#[derive(Debug, Clone, Default)]
pub struct GroceryList {
    units: UnitVocabulary,
    entries: Vec<Entry>,
    index: HashMap<(String, String), usize>,
}

impl GroceryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// List that compares units using a custom vocabulary
    pub fn with_units(units: UnitVocabulary) -> Self {
        Self {
            units,
            ..Self::default()
        }
    }

    /// Add every ingredient of `recipe`
    pub fn add_recipe(&mut self, recipe: &RecipeDetail) {
        let source = if recipe.title.is_empty() {
            &recipe.id
        } else {
            &recipe.title
        };
        for record in &recipe.ingredients {
            self.add(source, record);
        }
    }

    /// Add a single record needed by `recipe`.
    ///
    /// The "not available" placeholder is skipped, and so is an unnamed
    /// record without a quantity; an unnamed record with a quantity is kept.
    pub fn add(&mut self, recipe: &str, record: &IngredientRecord) {
        let name = record.name.trim();
        let unnamed = name.is_empty() || name == UNNAMED_INGREDIENT;
        if name == INGREDIENTS_UNAVAILABLE || (unnamed && record.quantity.trim().is_empty()) {
            return;
        }
        let name = if name.is_empty() { UNNAMED_INGREDIENT } else { name };

        let unit_key = self
            .units
            .canonical(&record.unit)
            .unwrap_or_else(|| record.unit.trim().to_lowercase());
        let key = (name.to_lowercase(), unit_key);

        let position = match self.index.get(&key) {
            Some(position) => *position,
            None => {
                self.entries.push(Entry {
                    name: name.to_string(),
                    unit: record.unit.trim().to_string(),
                    quantities: Vec::new(),
                    recipes: Vec::new(),
                });
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[position];
        if !record.quantity.trim().is_empty() {
            entry.quantities.push(record.quantity.trim().to_string());
        }
        if !recipe.is_empty() && !entry.recipes.iter().any(|r| r == recipe) {
            entry.recipes.push(recipe.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merged items in first-seen order
    pub fn items(&self) -> Vec<GroceryItem> {
        self.entries
            .iter()
            .map(|entry| GroceryItem {
                name: entry.name.clone(),
                quantity: combine_quantities(&entry.quantities),
                unit: entry.unit.clone(),
                recipes: entry.recipes.clone(),
            })
            .collect()
    }
}

fn combine_quantities(quantities: &[String]) -> String {
    if quantities.is_empty() {
        return String::new();
    }

    let parsed: Option<Vec<f64>> = quantities.iter().map(|q| parse_quantity(q)).collect();
    match parsed {
        Some(values) => format_quantity(values.iter().sum()),
        None => {
            let mut distinct: Vec<&str> = Vec::new();
            for quantity in quantities {
                if !distinct.contains(&quantity.as_str()) {
                    distinct.push(quantity);
                }
            }
            distinct.join(" + ")
        }
    }
}

/// Numeric value of a quantity such as `"2"`, `"0.5"`, `"1/2"`, `"1 1/2"` or `"1½"`
pub fn parse_quantity(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    match parts.as_slice() {
        [single] => parse_part(single),
        [whole, fraction] => {
            let whole: u32 = whole.parse().ok()?;
            let fraction = parse_part(fraction).filter(|f| *f < 1.0)?;
            Some(f64::from(whole) + fraction)
        }
        _ => None,
    }
}

fn parse_part(part: &str) -> Option<f64> {
    if let Some((numerator, denominator)) = part.split_once('/') {
        let numerator: u32 = numerator.parse().ok()?;
        let denominator: u32 = denominator.parse().ok()?;
        return (denominator != 0).then(|| f64::from(numerator) / f64::from(denominator));
    }

    if let Some(last) = part.chars().last() {
        if let Some(fraction) = vulgar_fraction(last) {
            let whole = &part[..part.len() - last.len_utf8()];
            let whole: u32 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
            return Some(f64::from(whole) + fraction);
        }
    }

    part.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

fn vulgar_fraction(c: char) -> Option<f64> {
    let value = match c {
        '½' => 1.0 / 2.0,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '¼' => 1.0 / 4.0,
        '¾' => 3.0 / 4.0,
        '⅕' => 1.0 / 5.0,
        '⅛' => 1.0 / 8.0,
        '⅜' => 3.0 / 8.0,
        '⅝' => 5.0 / 8.0,
        '⅞' => 7.0 / 8.0,
        _ => return None,
    };
    Some(value)
}

/// Format a total without trailing zeros, at most two decimals
pub fn format_quantity(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        return format!("{}", value.round() as i64);
    }
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}
