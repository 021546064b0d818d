use std::collections::HashSet;

/// Built-in measurement units, stored in singular form
const DEFAULT_UNITS: &[&str] = &[
    // volume
    "cup", "tablespoon", "tbsp", "tbs", "tbl", "teaspoon", "tsp", "pint", "pt", "quart", "qt",
    "gallon", "gal", "liter", "litre", "l", "milliliter", "millilitre", "ml", "deciliter", "dl",
    "cl", "floz",
    // mass
    "ounce", "oz", "pound", "lb", "gram", "g", "gr", "kilogram", "kg", "milligram", "mg",
    // count and informal measures
    "pinch", "dash", "drop", "splash", "handful", "clove", "slice", "piece", "can", "jar",
    "package", "packet", "pkg", "stick", "bunch", "sprig", "head", "stalk", "sheet", "bag",
    "box", "bottle", "leaf", "fillet", "cube", "scoop", "inch",
];

/// Plurals that do not follow the `s`/`es` suffix rule
const IRREGULAR_PLURALS: &[(&str, &str)] = &[("leaves", "leaf"), ("loaves", "loaf")];

/// Case-insensitive vocabulary of measurement units.
///
/// Tokens are matched after lowercasing and dropping a trailing `.`, and
/// plural forms ending in `s` or `es` resolve to their singular entry.
#[derive(Debug, Clone)]
pub struct UnitVocabulary {
    units: HashSet<String>,
}

impl Default for UnitVocabulary {
    fn default() -> Self {
        Self {
            units: DEFAULT_UNITS.iter().map(|u| u.to_string()).collect(),
        }
    }
}

impl UnitVocabulary {
    /// Extend the vocabulary with additional units (singular form)
    pub fn with_units<I, S>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for unit in units {
            let unit = unit.as_ref().trim().to_lowercase();
            if !unit.is_empty() {
                self.units.insert(unit);
            }
        }
        self
    }

    /// Whether `token` names a known unit
    pub fn is_unit(&self, token: &str) -> bool {
        self.canonical(token).is_some()
    }

    /// Singular vocabulary entry for `token`, if it is a unit
    pub fn canonical(&self, token: &str) -> Option<String> {
        let token = token.trim().trim_end_matches('.').to_lowercase();
        if token.is_empty() {
            return None;
        }
        if self.units.contains(&token) {
            return Some(token);
        }

        if let Some((_, singular)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == token)
        {
            if self.units.contains(*singular) {
                return Some(singular.to_string());
            }
        }

        ["s", "es"]
            .iter()
            .filter_map(|suffix| token.strip_suffix(suffix))
            .find(|stem| !stem.is_empty() && self.units.contains(*stem))
            .map(str::to_string)
    }

    /// Position of the first unit token in `words`, skipping the first `from`
    pub(crate) fn find_in(&self, words: &[&str], from: usize) -> Option<usize> {
        words
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, word)| self.is_unit(word))
            .map(|(index, _)| index)
    }
}
