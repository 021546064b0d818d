use html_escape::decode_html_entities;
use serde_json::{Map, Number, Value};

/// A key path into a JSON object; multi-segment paths descend into nested objects
pub(crate) type FieldPath = &'static [&'static str];

pub(crate) const NAME_PATHS: &[FieldPath] = &[
    &["ingredient_name"],
    &["name"],
    &["title"],
    &["item"],
    &["display_name"],
    &["ingredient", "name"],
    &["ingredient", "ingredient_name"],
    &["ingredient"],
];

pub(crate) const QUANTITY_PATHS: &[FieldPath] = &[&["quantity"], &["amount"], &["qty"]];

pub(crate) const UNIT_PATHS: &[FieldPath] = &[
    &["unit"],
    &["units"],
    &["measurement"],
    &["unit", "name"],
    &["unit", "abbreviation"],
];

pub(crate) const PREPARATION_PATHS: &[FieldPath] = &[&["preparation"], &["prep"], &["method"]];

/// Free-text fields used when an object carries no name of its own
pub(crate) const TEXT_PATHS: &[FieldPath] =
    &[&["text"], &["original"], &["raw"], &["description"]];

/// First non-empty text found along `paths`, in order
pub(crate) fn probe(object: &Map<String, Value>, paths: &[FieldPath]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| resolve(object, *path))
        .find_map(value_text)
}

fn resolve<'a>(object: &'a Map<String, Value>, path: FieldPath) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(object.get(*first)?, |value, key| value.get(*key))
}

/// Text content of a scalar value; objects, arrays, null and empty strings yield `None`
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let text = decode_html_entities(s.trim()).trim().to_string();
            (!text.is_empty()).then_some(text)
        }
        Value::Number(n) => Some(format_number(n)),
        _ => None,
    }
}

/// Render a JSON number the way a person would write it: `1.0` becomes `"1"`
pub(crate) fn format_number(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => number.to_string(),
    }
}
