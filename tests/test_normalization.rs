use chopsmo_recipes::{
    ingredients_or_placeholder, normalize, normalize_for_display, GroceryList,
    IngredientNormalizer, IngredientRecord, RawIngredients,
};
use serde_json::json;

fn record(name: &str, quantity: &str, unit: &str, preparation: &str) -> IngredientRecord {
    IngredientRecord {
        name: name.to_string(),
        quantity: quantity.to_string(),
        unit: unit.to_string(),
        preparation: preparation.to_string(),
    }
}

#[test]
fn test_documented_examples() {
    assert_eq!(
        normalize(&json!(["2 cups flour, sifted"])),
        vec![record("flour", "2", "cups", "sifted")]
    );
    assert_eq!(
        normalize(&json!([{"name": "Salt", "quantity": "1", "unit": "tsp"}])),
        vec![record("Salt", "1", "tsp", "")]
    );
    assert_eq!(
        normalize(&json!("tomato, onion, garlic")),
        vec![
            IngredientRecord::named("tomato"),
            IngredientRecord::named("onion"),
            IngredientRecord::named("garlic"),
        ]
    );
    assert!(normalize(&json!([])).is_empty());
}

#[test]
fn test_placeholder_for_display() {
    assert_eq!(
        normalize_for_display(&json!([])),
        vec![IngredientRecord::unavailable()]
    );
    assert_eq!(
        ingredients_or_placeholder(normalize(&json!(false))),
        vec![IngredientRecord::unavailable()]
    );
}

#[test]
fn test_text_list_length_property() {
    let inputs = vec![
        vec!["1 egg", "2 cups milk", "salt"],
        vec!["", "  ", "\n"],
        vec!["• 1 onion", "", "- pepper", "3)  4 carrots, diced", "\t"],
        vec!["a", "b", "c", "d", "e", "f"],
    ];

    for lines in inputs {
        let expected = lines.iter().filter(|l| !l.trim().is_empty()).count();
        assert_eq!(normalize(&json!(lines)).len(), expected, "input: {lines:?}");
    }
}

#[test]
fn test_order_is_preserved() {
    let raw = json!(["1 apple", {"name": "Banana"}, "cherry", {"title": "Date"}]);
    let names: Vec<String> = normalize(&raw).into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["apple", "Banana", "cherry", "Date"]);
}

#[test]
fn test_recipe_payload_with_html_ingredients() {
    let raw = json!({
        "title": "Guacamole",
        "ingredients_text": "<ul><li>2 ripe avocados, mashed</li><li>1 lime, juiced</li><li>Salt &amp; pepper</li></ul>"
    });

    assert_eq!(
        normalize(&raw),
        vec![
            record("ripe avocados", "2", "", "mashed"),
            record("lime", "1", "", "juiced"),
            record("Salt & pepper", "", "", ""),
        ]
    );
}

#[test]
fn test_paragraph_filters_prose() {
    let raw = json!("You will need:\n1 can tomatoes\n2 cloves garlic, minced\nSimmer for 20 minutes and serve.");
    assert_eq!(
        normalize(&raw),
        vec![
            record("tomatoes", "1", "can", ""),
            record("garlic", "2", "cloves", "minced"),
        ]
    );
}

#[test]
fn test_idempotence_over_mixed_input() {
    let raw = json!([
        "1 1/2 cups warm water",
        "½ tsp. salt",
        {"ingredient": {"ingredient_name": "Yeast"}, "qty": 7, "unit": {"abbreviation": "g"}},
        "Olive oil, for drizzling",
    ]);

    let once = normalize(&raw);
    let twice = normalize(&serde_json::to_value(&once).unwrap());
    assert_eq!(once, twice);
    assert_eq!(once[2], record("Yeast", "7", "g", ""));
    assert_eq!(once[3], record("Olive oil", "", "", "for drizzling"));
}

#[test]
fn test_idempotence_with_html_entities() {
    let raw = json!([
        "Salt &amp; pepper",
        "2 tbsp fish sauce, &frac12; for serving",
        {"name": "Mac &amp; cheese", "quantity": "1", "unit": "box"},
    ]);

    let once = normalize(&raw);
    let twice = normalize(&serde_json::to_value(&once).unwrap());
    assert_eq!(once, twice);
    assert_eq!(once[0].name, "Salt & pepper");
    assert_eq!(once[1].preparation, "½ for serving");
    assert_eq!(once[2].name, "Mac & cheese");
}

#[test]
fn test_free_text_string_keeps_preparation() {
    assert_eq!(
        normalize(&json!("2 cups flour, sifted")),
        vec![record("flour", "2", "cups", "sifted")]
    );
    assert_eq!(normalize(&json!("tomato, onion, garlic")).len(), 3);
}

#[test]
fn test_classification_is_exposed() {
    let raw = RawIngredients::classify(&json!({"ingredient_data": "flour"}));
    assert_eq!(raw, RawIngredients::FreeText("flour".to_string()));

    let records = IngredientNormalizer::new().normalize_raw(raw);
    assert_eq!(records, vec![IngredientRecord::named("flour")]);
}

#[test]
fn test_grocery_list_from_normalized_records() {
    let monday = normalize(&json!(["2 cups flour", "1 egg", "pinch of salt"]));
    let tuesday = normalize(&json!([{"name": "Flour", "quantity": "1/2", "unit": "cup"}, "2 eggs"]));

    let mut list = GroceryList::new();
    for record in &monday {
        list.add("Monday", record);
    }
    for record in &tuesday {
        list.add("Tuesday", record);
    }

    let items = list.items();
    assert_eq!(items[0].name, "flour");
    assert_eq!(items[0].quantity, "2.5");
    assert_eq!(items[0].recipes, vec!["Monday", "Tuesday"]);
    // "egg" and "eggs" are different names; no stemming of ingredient names
    assert_eq!(list.len(), 4);
}
