//! Normalization of loosely structured ingredient data.
//!
//! Backend payloads carry ingredients as arrays of strings, arrays of
//! objects with varying key names, single objects or free text (sometimes
//! HTML). [`RawIngredients::classify`] tags the input once, and
//! [`IngredientNormalizer`] turns each shape into [`IngredientRecord`]s.
//!
//! Normalization never fails: unrecognized input yields an empty list and
//! callers decide how to present that (see
//! [`ingredients_or_placeholder`](crate::model::ingredients_or_placeholder)).

pub(crate) mod fields;
mod line;
mod text;
mod units;

pub use text::IngredientLexicon;
pub use units::UnitVocabulary;

use crate::config::NormalizerConfig;
use crate::model::IngredientRecord;
use fields::{
    format_number, probe, value_text, NAME_PATHS, PREPARATION_PATHS, QUANTITY_PATHS, TEXT_PATHS,
    UNIT_PATHS,
};
use log::debug;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};

/// Keys under which a recipe payload may carry its ingredients, in priority order
pub const INGREDIENT_FIELDS: &[&str] = &[
    "ingredients",
    "ingredient_list",
    "recipe_ingredients",
    "ingredients_text",
    "ingredient_data",
];

const MAX_NESTING: usize = 4;

static DEFAULT_NORMALIZER: Lazy<IngredientNormalizer> = Lazy::new(IngredientNormalizer::default);

/// Ingredient input tagged by shape
#[derive(Debug, Clone, PartialEq)]
pub enum RawIngredients {
    /// Array of text lines (strings or bare numbers)
    Lines(Vec<String>),
    /// Array containing objects, possibly mixed with strings
    Items(Vec<Value>),
    /// A single ingredient object
    Object(Map<String, Value>),
    /// Free-form text, plain or HTML
    FreeText(String),
    /// Nothing we know how to read
    Unrecognized,
}

impl RawIngredients {
    /// Determine the shape of `value`.
    ///
    /// Objects that carry one of [`INGREDIENT_FIELDS`] are unwrapped and the
    /// field's value is classified instead.
    pub fn classify(value: &Value) -> Self {
        Self::classify_nested(value, 0)
    }

    fn classify_nested(value: &Value, depth: usize) -> Self {
        match value {
            Value::Array(items) if items.iter().all(|i| i.is_string() || i.is_number()) => {
                RawIngredients::Lines(items.iter().filter_map(scalar_line).collect())
            }
            Value::Array(items) => RawIngredients::Items(items.clone()),
            Value::Object(map) => match ingredient_field(map) {
                Some(_) if depth >= MAX_NESTING => RawIngredients::Unrecognized,
                Some(Value::Null) => RawIngredients::Unrecognized,
                Some(field) => Self::classify_nested(field, depth + 1),
                None => RawIngredients::Object(map.clone()),
            },
            Value::String(text) => RawIngredients::FreeText(text.clone()),
            Value::Number(n) => RawIngredients::Lines(vec![format_number(n)]),
            Value::Null | Value::Bool(_) => RawIngredients::Unrecognized,
        }
    }
}

/// First non-null ingredient field of `map`; `Null` when the fields exist but are all null
fn ingredient_field(map: &Map<String, Value>) -> Option<&Value> {
    let mut present = INGREDIENT_FIELDS.iter().filter_map(|key| map.get(*key)).peekable();
    let first = *present.peek()?;
    Some(present.find(|v| !v.is_null()).unwrap_or(first))
}

fn scalar_line(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(format_number(n)),
        _ => None,
    }
}

/// Converts raw ingredient data into normalized records
#[derive(Debug, Clone, Default)]
pub struct IngredientNormalizer {
    units: UnitVocabulary,
    lexicon: IngredientLexicon,
}

impl IngredientNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer with the configured extra units and ingredient words
    pub fn from_config(config: &NormalizerConfig) -> Self {
        Self::default()
            .with_units(&config.extra_units)
            .with_ingredient_words(&config.extra_ingredient_words)
    }

    pub fn with_units<I, S>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.units = self.units.with_units(units);
        self
    }

    pub fn with_ingredient_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lexicon = self.lexicon.with_words(words);
        self
    }

    pub fn units(&self) -> &UnitVocabulary {
        &self.units
    }

    /// Normalize any JSON value holding ingredients
    pub fn normalize(&self, raw: &Value) -> Vec<IngredientRecord> {
        self.normalize_raw(RawIngredients::classify(raw))
    }

    /// Normalize input whose shape has already been determined
    pub fn normalize_raw(&self, raw: RawIngredients) -> Vec<IngredientRecord> {
        match raw {
            RawIngredients::Lines(lines) => lines
                .iter()
                .filter_map(|line| self.parse_line(line))
                .collect(),
            RawIngredients::Items(items) => items
                .iter()
                .filter_map(|item| self.normalize_item(item))
                .collect(),
            RawIngredients::Object(object) => vec![self.from_object(&object)],
            RawIngredients::FreeText(text) => self.normalize_text(&text),
            RawIngredients::Unrecognized => {
                debug!("Unrecognized ingredient data, returning no ingredients");
                Vec::new()
            }
        }
    }

    /// Normalize a free-form block of text
    pub fn normalize_text(&self, block: &str) -> Vec<IngredientRecord> {
        text::free_text_lines(block, &self.units, &self.lexicon)
            .iter()
            .filter_map(|line| self.parse_line(line))
            .collect()
    }

    /// Parse a single ingredient line; `None` for blank lines
    pub fn parse_line(&self, line: &str) -> Option<IngredientRecord> {
        line::parse_line(line, &self.units)
    }

    fn normalize_item(&self, item: &Value) -> Option<IngredientRecord> {
        match item {
            Value::Object(object) => Some(self.from_object(object)),
            Value::String(line) => self.parse_line(line),
            Value::Number(n) => self.parse_line(&format_number(n)),
            Value::Array(parts) => {
                let joined = parts
                    .iter()
                    .filter_map(value_text)
                    .collect::<Vec<_>>()
                    .join(" ");
                self.parse_line(&joined)
            }
            Value::Null | Value::Bool(_) => None,
        }
    }

    fn from_object(&self, object: &Map<String, Value>) -> IngredientRecord {
        let mut record = match probe(object, NAME_PATHS) {
            Some(name) => IngredientRecord::named(name),
            None => probe(object, TEXT_PATHS)
                .and_then(|text| self.parse_line(&text))
                .unwrap_or_default(),
        };

        if let Some(quantity) = probe(object, QUANTITY_PATHS) {
            record.quantity = quantity;
        }
        if let Some(unit) = probe(object, UNIT_PATHS) {
            record.unit = unit;
        }
        if let Some(preparation) = probe(object, PREPARATION_PATHS) {
            record.preparation = preparation;
        }
        record
    }
}

/// Normalize `raw` with the default vocabulary
pub fn normalize(raw: &Value) -> Vec<IngredientRecord> {
    DEFAULT_NORMALIZER.normalize(raw)
}
