use quantgen::model::loader::{load_db_from_str, SchemaError};
use quantgen::model::{DataType, TimeRepr};

fn doc(entities: &str, tables: &str) -> String {
    format!(r#"{{"entities": {entities}, "tables": {tables}}}"#)
}

#[test]
fn test_load_resolves_every_selector_field_eagerly() {
    let content = doc(
        r#"[
            {"name": "Blok", "columns": [{"name": "Jmeno", "data_type": "string"}]},
            {"name": "Stroj", "columns": []}
        ]"#,
        r#"[
            {"name": "Teplota", "selector": ["Stroj", "Blok", "Time"], "time_repr": "Changes",
             "columns": [{"name": "tC", "data_type": "float"}]}
        ]"#,
    );
    let db = load_db_from_str(&content).unwrap();

    let selector = &db.tables[0].selector;
    assert_eq!(selector.fields[0].entity_index(), Some(1));
    assert_eq!(selector.fields[1].entity_index(), Some(0));
    assert_eq!(db.entity(1).name, "Stroj");
    assert_eq!(db.entity(0).name, "Blok");
    assert!(selector.fields[2].is_time());
}

#[test]
fn test_declaration_order_is_preserved() {
    let content = doc(
        r#"[
            {"name": "B", "columns": []},
            {"name": "A", "columns": []}
        ]"#,
        r#"[
            {"name": "T2", "selector": ["Time"], "time_repr": "Dense", "columns": []},
            {"name": "T1", "selector": ["Time"], "time_repr": "Interval", "columns": []}
        ]"#,
    );
    let db = load_db_from_str(&content).unwrap();

    let entity_names: Vec<&str> = db.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(entity_names, vec!["B", "A"]);
    let table_names: Vec<&str> = db.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(table_names, vec!["T2", "T1"]);
    assert_eq!(db.tables[1].time_repr, TimeRepr::Interval);
}

#[test]
fn test_ghost_reference_fails_with_context() {
    let content = doc(
        "[]",
        r#"[
            {"name": "T", "selector": ["Ghost", "Time"], "time_repr": "Dense", "columns": []}
        ]"#,
    );
    let err = load_db_from_str(&content).unwrap_err();

    // The message itself names the table and field for diagnosis.
    let message = err.to_string();
    assert!(message.contains("Ghost"));
    assert!(message.contains("T"));

    match err {
        SchemaError::UnknownEntity { table, field } => {
            assert_eq!(table, "T");
            assert_eq!(field, "Ghost");
        }
        other => panic!("expected UnknownEntity, got {other:?}"),
    }
}

#[test]
fn test_all_scalar_kinds_load() {
    let content = doc(
        r#"[
            {"name": "E", "columns": [
                {"name": "a", "data_type": "int"},
                {"name": "b", "data_type": "float"},
                {"name": "c", "data_type": "string"}
            ]}
        ]"#,
        "[]",
    );
    let db = load_db_from_str(&content).unwrap();

    let kinds: Vec<DataType> = db.entities[0].columns.iter().map(|c| c.data_type).collect();
    assert_eq!(kinds, vec![DataType::Int, DataType::Float, DataType::Text]);
}

#[test]
fn test_wrong_shape_is_rejected() {
    // `selector` must be an array of strings.
    let content = doc(
        "[]",
        r#"[
            {"name": "T", "selector": "Time", "time_repr": "Dense", "columns": []}
        ]"#,
    );
    assert!(matches!(
        load_db_from_str(&content).unwrap_err(),
        SchemaError::Parse { .. }
    ));
}

#[test]
fn test_no_partial_model_on_late_failure() {
    // The first table is fine; the second is broken. Loading must fail as
    // a whole.
    let content = doc(
        r#"[{"name": "Blok", "columns": []}]"#,
        r#"[
            {"name": "Ok", "selector": ["Blok", "Time"], "time_repr": "Dense", "columns": []},
            {"name": "Broken", "selector": ["Ghost", "Time"], "time_repr": "Dense", "columns": []}
        ]"#,
    );
    assert!(load_db_from_str(&content).is_err());
}
