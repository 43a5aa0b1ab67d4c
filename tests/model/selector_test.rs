use quantgen::model::loader::load_db_from_str;
use quantgen::model::{canonical_selectors, SelField};

fn db_with_tables(entities: &[&str], selectors: &[&[&str]]) -> quantgen::model::QuantityDb {
    let entities_json: Vec<String> = entities
        .iter()
        .map(|name| format!(r#"{{"name": "{name}", "columns": []}}"#))
        .collect();
    let tables_json: Vec<String> = selectors
        .iter()
        .enumerate()
        .map(|(i, fields)| {
            let fields_json: Vec<String> = fields.iter().map(|f| format!("\"{f}\"")).collect();
            format!(
                r#"{{"name": "T{i}", "selector": [{}], "time_repr": "Dense", "columns": []}}"#,
                fields_json.join(", ")
            )
        })
        .collect();
    let content = format!(
        r#"{{"entities": [{}], "tables": [{}]}}"#,
        entities_json.join(", "),
        tables_json.join(", ")
    );
    load_db_from_str(&content).unwrap()
}

#[test]
fn test_two_field_selector_variant_name_and_payload() {
    let db = db_with_tables(&["A", "B"], &[&["A", "B", "Time"]]);
    let selectors = canonical_selectors(&db);

    assert_eq!(selectors.len(), 1);
    insta::assert_snapshot!(selectors[0].variant_name(), @"AB");

    let payload: Vec<&str> = selectors[0]
        .non_time_fields()
        .iter()
        .map(SelField::name)
        .collect();
    assert_eq!(payload, vec!["A", "B"]);
}

#[test]
fn test_identical_selectors_share_one_variant() {
    let db = db_with_tables(&["Blok"], &[&["Blok", "Time"], &["Blok", "Time"]]);
    let selectors = canonical_selectors(&db);

    assert_eq!(selectors.len(), 1);
    assert_eq!(selectors[0].variant_name(), "Blok");
}

#[test]
fn test_distinct_selectors_get_distinct_variants() {
    let db = db_with_tables(&["Blok"], &[&["Blok", "Time"], &["Time"]]);
    let selectors = canonical_selectors(&db);

    let names: Vec<String> = selectors.iter().map(|s| s.variant_name()).collect();
    assert_eq!(names, vec!["Blok".to_string(), "Unit".to_string()]);
}

#[test]
fn test_canonical_order_ignores_table_declaration_order() {
    let forward = db_with_tables(&["A", "B"], &[&["A", "Time"], &["B", "Time"]]);
    let reversed = db_with_tables(&["A", "B"], &[&["B", "Time"], &["A", "Time"]]);

    let forward_names: Vec<String> = canonical_selectors(&forward)
        .iter()
        .map(|s| s.variant_name())
        .collect();
    let reversed_names: Vec<String> = canonical_selectors(&reversed)
        .iter()
        .map(|s| s.variant_name())
        .collect();

    assert_eq!(forward_names, reversed_names);
    assert_eq!(forward_names, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn test_field_order_distinguishes_selectors() {
    let db = db_with_tables(&["A", "B"], &[&["A", "B", "Time"], &["B", "A", "Time"]]);
    let selectors = canonical_selectors(&db);

    assert_eq!(selectors.len(), 2);
    let names: Vec<String> = selectors.iter().map(|s| s.variant_name()).collect();
    assert_eq!(names, vec!["AB".to_string(), "BA".to_string()]);
}

#[test]
#[should_panic(expected = "selector variant name collision")]
fn test_variant_name_collision_is_fatal() {
    // ["AB", "C"] and ["A", "BC"] both concatenate to "ABC".
    let db = db_with_tables(
        &["A", "AB", "BC", "C"],
        &[&["AB", "C", "Time"], &["A", "BC", "Time"]],
    );
    canonical_selectors(&db);
}
