use crate::ingredients::units::UnitVocabulary;
use html_escape::decode_html_entities;
use crate::model::{IngredientRecord, UNNAMED_INGREDIENT};
use once_cell::sync::Lazy;
use regex::Regex;

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*•·+▪◦‣]+\s*|\d+[.)]\s+)").unwrap());

// Mixed numbers first so "1 1/2" is not read as "1"
static QUANTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:\d+\s+\d+/\d+|\d+/\d+|\d*[½⅓⅔¼¾⅕⅛⅜⅝⅞]|\d+(?:\.\d+)?)(?:\s*(?:-|–|to)\s*(?:\d+/\d+|\d*[½⅓⅔¼¾⅛]|\d+(?:\.\d+)?))?",
    )
    .unwrap()
});

/// Remove a leading bullet or list number (`-`, `•`, `+`, `1.`, `2)`)
pub(crate) fn strip_list_marker(line: &str) -> &str {
    match LIST_MARKER.find(line) {
        Some(marker) => line[marker.end()..].trim_start(),
        None => line,
    }
}

/// Split a leading quantity off `text`, returning `(quantity, rest)`
pub(crate) fn split_quantity(text: &str) -> (Option<String>, &str) {
    match QUANTITY.find(text) {
        Some(found) => {
            let quantity = found.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
            (Some(quantity), text[found.end()..].trim_start())
        }
        None => (None, text),
    }
}

/// Whether `text` opens with something that reads as a quantity
pub(crate) fn starts_with_quantity(text: &str) -> bool {
    QUANTITY.is_match(strip_list_marker(text.trim()))
}

/// Parse a single free-text ingredient line such as `"2 cups flour, sifted"`.
///
/// Returns `None` only for blank input; any other line produces a record,
/// falling back to a name-only record when nothing else can be recognized.
pub(crate) fn parse_line(line: &str, units: &UnitVocabulary) -> Option<IngredientRecord> {
    let decoded = decode_html_entities(line);
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        return None;
    }

    let stripped = strip_list_marker(trimmed);
    // A bare marker is still an input line; keep it as written
    let text = if stripped.is_empty() { trimmed } else { stripped };

    let (quantity, rest) = split_quantity(text);
    let (main, preparation) = match rest.split_once(',') {
        Some((main, preparation)) => (main.trim(), preparation.trim()),
        None => (rest.trim(), ""),
    };

    let words: Vec<&str> = main.split_whitespace().collect();
    let (unit, mut name_words) = take_unit(&words, quantity.is_some(), units);
    if name_words.len() > 1 && name_words[0].eq_ignore_ascii_case("of") {
        name_words.remove(0);
    }

    let mut name = name_words.join(" ");
    if name.is_empty() {
        name = UNNAMED_INGREDIENT.to_string();
    }

    Some(IngredientRecord {
        name,
        quantity: quantity.unwrap_or_default(),
        unit,
        preparation: preparation.to_string(),
    })
}

/// Pull the unit token out of `words`.
///
/// Without a quantity only an explicit `<unit> of <name>` form ("pinch of
/// salt") yields a unit, so "Head lettuce" keeps its name. With a quantity
/// the token right after it is tried first, then the remaining words are
/// scanned for an embedded unit ("1 heaping tablespoon sugar"). A unit is
/// only taken when at least one word is left over for the name.
fn take_unit<'a>(
    words: &[&'a str],
    has_quantity: bool,
    units: &UnitVocabulary,
) -> (String, Vec<&'a str>) {
    if words.len() < 2 {
        return (String::new(), words.to_vec());
    }

    let position = if !has_quantity {
        let explicit = words[1].eq_ignore_ascii_case("of") && units.is_unit(words[0]);
        explicit.then_some(0)
    } else if units.is_unit(words[0]) {
        Some(0)
    } else {
        units.find_in(words, 1)
    };

    match position {
        Some(index) => {
            let unit = words[index].trim_end_matches('.').to_string();
            let rest = words
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, word)| *word)
                .collect();
            (unit, rest)
        }
        None => (String::new(), words.to_vec()),
    }
}
