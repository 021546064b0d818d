use crate::ingredients::line::starts_with_quantity;
use crate::ingredients::units::UnitVocabulary;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Common ingredient words used to tell ingredient lines apart from prose
const DEFAULT_INGREDIENT_WORDS: &[&str] = &[
    "salt", "pepper", "sugar", "flour", "butter", "oil", "egg", "milk", "water", "cream",
    "cheese", "garlic", "onion", "shallot", "tomato", "potato", "carrot", "celery", "chicken",
    "beef", "pork", "lamb", "fish", "salmon", "shrimp", "bacon", "rice", "pasta", "noodle",
    "bread", "lemon", "lime", "orange", "apple", "banana", "vinegar", "honey", "yeast", "soda",
    "vanilla", "cinnamon", "nutmeg", "cumin", "paprika", "oregano", "basil", "parsley",
    "cilantro", "thyme", "rosemary", "ginger", "chili", "chilli", "mushroom", "spinach",
    "broccoli", "bean", "lentil", "pea", "corn", "yogurt", "stock", "broth", "sauce", "wine",
    "chocolate", "cocoa", "nut", "almond", "walnut", "oat", "tofu", "avocado", "cucumber",
    "zucchini", "lettuce", "cabbage", "coconut", "mustard", "mayonnaise", "ketchup",
];

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[a-zA-Z/][^>]*>").unwrap());

static LINE_BREAK_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</(?:p|div|h[1-6]|tr)>").unwrap());

static LIST_ITEM: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());

/// Vocabulary of words that signal a line is about an ingredient
#[derive(Debug, Clone)]
pub struct IngredientLexicon {
    words: HashSet<String>,
}

impl Default for IngredientLexicon {
    fn default() -> Self {
        Self {
            words: DEFAULT_INGREDIENT_WORDS
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

impl IngredientLexicon {
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() {
                self.words.insert(word);
            }
        }
        self
    }

    pub fn contains(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.words.contains(&word)
            || ["s", "es"]
                .iter()
                .filter_map(|suffix| word.strip_suffix(suffix))
                .any(|stem| self.words.contains(stem))
    }
}

/// Break a free-form text block into candidate ingredient lines.
///
/// HTML list items are item boundaries and are returned as-is. Otherwise
/// the text is split on line breaks; a single line with commas or
/// semicolons is a comma-separated list, and a multi-line paragraph keeps
/// only lines that carry a culinary signal.
pub(crate) fn free_text_lines(
    text: &str,
    units: &UnitVocabulary,
    lexicon: &IngredientLexicon,
) -> Vec<String> {
    let flattened = if HTML_TAG.is_match(text) {
        let fragment = Html::parse_fragment(text);
        let items: Vec<String> = fragment
            .select(&LIST_ITEM)
            .map(|li| collapse_whitespace(&li.text().collect::<String>()))
            .filter(|item| !item.is_empty())
            .collect();
        if !items.is_empty() {
            debug!("Free text: found {} HTML list items", items.len());
            return items;
        }
        html_to_text(text)
    } else {
        html_escape::decode_html_entities(text).into_owned()
    };

    let lines: Vec<&str> = flattened
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    match lines.as_slice() {
        [] => Vec::new(),
        [single] if is_name_list(single, units) => single
            .split([',', ';'])
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect(),
        [single] => vec![single.to_string()],
        _ => {
            let kept: Vec<String> = lines
                .iter()
                .filter(|line| has_culinary_signal(line, units, lexicon))
                .map(|line| line.to_string())
                .collect();
            debug!(
                "Free text: kept {} of {} lines as ingredients",
                kept.len(),
                lines.len()
            );
            kept
        }
    }
}

/// A single line like `"tomato, onion, garlic"`: separated, and no segment opens
/// with a quantity or a unit, so a trailing clause is not a preparation note
fn is_name_list(line: &str, units: &UnitVocabulary) -> bool {
    line.contains([',', ';'])
        && line.split([',', ';']).all(|segment| {
            let segment = segment.trim();
            !starts_with_quantity(segment)
                && segment
                    .split_whitespace()
                    .next()
                    .map_or(true, |first| !units.is_unit(first))
        })
}

/// Whether a line mentions a quantity, a unit or a known ingredient
pub(crate) fn has_culinary_signal(
    line: &str,
    units: &UnitVocabulary,
    lexicon: &IngredientLexicon,
) -> bool {
    if starts_with_quantity(line) {
        return true;
    }
    line.split(|c: char| !c.is_alphanumeric() && c != '.')
        .map(|word| word.trim_matches('.'))
        .filter(|word| !word.is_empty())
        .any(|word| units.is_unit(word) || lexicon.contains(word))
}

fn html_to_text(html: &str) -> String {
    let with_breaks = LINE_BREAK_TAG.replace_all(html, "\n");
    let fragment = Html::parse_fragment(&with_breaks);
    fragment.root_element().text().collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
