use crate::ingredients::fields::value_text;
use crate::ingredients::{IngredientNormalizer, INGREDIENT_FIELDS};
use crate::model::{RecipeDetail, RecipeSummary};
use log::debug;
use serde_json::{Map, Value};

const ENVELOPE_KEYS: &[&str] = &["recipe", "data"];
const LIST_KEYS: &[&str] = &["results", "recipes", "data"];

const ID_KEYS: &[&str] = &["id", "recipe_id", "pk", "slug"];
const TITLE_KEYS: &[&str] = &["title", "name", "recipe_name"];
const DESCRIPTION_KEYS: &[&str] = &["description", "summary"];
const IMAGE_KEYS: &[&str] = &["image", "image_url", "thumbnail", "photo"];
const SERVINGS_KEYS: &[&str] = &["servings", "yield", "serves"];
const INSTRUCTION_KEYS: &[&str] = &["instructions", "steps", "directions", "method"];
const STEP_TEXT_KEYS: &[&str] = &["text", "step", "instruction", "description"];

/// Build a recipe from a detail payload, normalizing its ingredients
pub fn recipe_from_payload(
    payload: &Value,
    requested_id: &str,
    normalizer: &IngredientNormalizer,
) -> RecipeDetail {
    let recipe = unwrap_envelope(payload);
    let Some(object) = recipe.as_object() else {
        debug!("Recipe payload for '{}' is not an object", requested_id);
        return RecipeDetail {
            id: requested_id.to_string(),
            ..Default::default()
        };
    };

    let ingredients = match first_present(object, INGREDIENT_FIELDS) {
        Some(raw) => normalizer.normalize(raw),
        None => {
            debug!("Recipe '{}' has no ingredient field", requested_id);
            Vec::new()
        }
    };

    RecipeDetail {
        id: text_field(object, ID_KEYS).unwrap_or_else(|| requested_id.to_string()),
        title: text_field(object, TITLE_KEYS).unwrap_or_default(),
        description: text_field(object, DESCRIPTION_KEYS),
        image: image_field(object),
        servings: text_field(object, SERVINGS_KEYS),
        ingredients,
        instructions: first_present(object, INSTRUCTION_KEYS)
            .map(instruction_steps)
            .unwrap_or_default(),
    }
}

/// Build recipe summaries from a list or search payload
pub fn summaries_from_payload(payload: &Value) -> Vec<RecipeSummary> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(object) => match LIST_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_array))
        {
            Some(items) => items,
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|object| RecipeSummary {
            id: text_field(object, ID_KEYS).unwrap_or_default(),
            title: text_field(object, TITLE_KEYS).unwrap_or_default(),
            image: image_field(object),
        })
        .collect()
}

fn unwrap_envelope(payload: &Value) -> &Value {
    ENVELOPE_KEYS
        .iter()
        .find_map(|key| payload.get(*key).filter(|v| v.is_object()))
        .unwrap_or(payload)
}

fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(value_text)
}

fn image_field(object: &Map<String, Value>) -> Option<String> {
    keys_values(object, IMAGE_KEYS).find_map(|value| match value {
        Value::Array(images) => images.first().and_then(image_url),
        other => image_url(other),
    })
}

fn image_url(value: &Value) -> Option<String> {
    value_text(value).or_else(|| value.get("url").and_then(value_text))
}

fn keys_values<'a>(
    object: &'a Map<String, Value>,
    keys: &'a [&'a str],
) -> impl Iterator<Item = &'a Value> + 'a {
    keys.iter().filter_map(move |key| object.get(*key))
}

/// Instruction steps from a string (one step per line) or an array of strings/objects
fn instruction_steps(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => html_escape::decode_html_entities(text)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(steps) => steps
            .iter()
            .filter_map(|step| match step {
                Value::Object(object) => text_field(object, STEP_TEXT_KEYS),
                other => value_text(other),
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IngredientRecord;
    use serde_json::json;

    #[test]
    fn test_recipe_from_payload() {
        let payload = json!({
            "id": 42,
            "title": "Pancakes",
            "description": "Fluffy &amp; light",
            "image": {"url": "https://example.com/p.jpg"},
            "servings": 4,
            "ingredient_list": ["2 cups flour, sifted", {"name": "Salt", "quantity": "1", "unit": "tsp"}],
            "steps": [{"text": "Mix."}, "Cook."]
        });

        let recipe = recipe_from_payload(&payload, "42", &IngredientNormalizer::default());
        assert_eq!(recipe.id, "42");
        assert_eq!(recipe.title, "Pancakes");
        assert_eq!(recipe.description.as_deref(), Some("Fluffy & light"));
        assert_eq!(recipe.image.as_deref(), Some("https://example.com/p.jpg"));
        assert_eq!(recipe.servings.as_deref(), Some("4"));
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].unit, "cups");
        assert_eq!(recipe.instructions, vec!["Mix.", "Cook."]);
    }

    #[test]
    fn test_envelope_and_text_instructions() {
        let payload = json!({
            "recipe": {
                "name": "Salad",
                "ingredients_text": "lettuce, tomato",
                "instructions": "Wash.\n\nToss."
            }
        });

        let recipe = recipe_from_payload(&payload, "7", &IngredientNormalizer::default());
        assert_eq!(recipe.id, "7");
        assert_eq!(recipe.title, "Salad");
        assert_eq!(
            recipe.ingredients,
            vec![IngredientRecord::named("lettuce"), IngredientRecord::named("tomato")]
        );
        assert_eq!(recipe.instructions, vec!["Wash.", "Toss."]);
    }

    #[test]
    fn test_recipe_without_ingredients() {
        let payload = json!({"title": "Mystery", "ingredients": null});
        let recipe = recipe_from_payload(&payload, "1", &IngredientNormalizer::default());
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.instructions.is_empty());
    }

    #[test]
    fn test_non_object_payload() {
        let recipe = recipe_from_payload(&json!("oops"), "9", &IngredientNormalizer::default());
        assert_eq!(recipe.id, "9");
        assert!(recipe.title.is_empty());
    }

    #[test]
    fn test_summaries() {
        let payload = json!({"count": 2, "results": [
            {"id": 1, "title": "Soup", "image_url": "https://example.com/s.jpg"},
            {"slug": "stew", "name": "Stew", "image": ["https://example.com/a.jpg"]},
            "junk"
        ]});

        let summaries = summaries_from_payload(&payload);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, "1");
        assert_eq!(summaries[0].image.as_deref(), Some("https://example.com/s.jpg"));
        assert_eq!(summaries[1].id, "stew");
        assert_eq!(summaries[1].title, "Stew");
        assert_eq!(summaries[1].image.as_deref(), Some("https://example.com/a.jpg"));

        assert_eq!(summaries_from_payload(&json!([{"id": 3}])).len(), 1);
        assert!(summaries_from_payload(&json!({"detail": "none"})).is_empty());
    }
}
