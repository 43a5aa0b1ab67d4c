use std::fs;

use quantgen::generate::{
    generate_from_str, GenerateError, INPUT_SCHEMA_FILE, RELATIONAL_FILE, RUNTIME_FILE,
};
use quantgen::model::loader::SchemaError;
use quantgen::output::OutputWriter;

/// The end-to-end example input.
const INPUT: &str = r#"{
    "entities": [
        {"name": "Blok", "columns": [{"name": "Jmeno", "data_type": "string"}]}
    ],
    "tables": [
        {
            "name": "BlokVykon",
            "selector": ["Blok", "Time"],
            "time_repr": "Dense",
            "columns": [{"name": "pInst", "data_type": "float"}]
        }
    ]
}"#;

#[test]
fn test_end_to_end_example() {
    let artifacts = generate_from_str(INPUT).unwrap();

    // One entity identifier type and one selector variant.
    assert!(artifacts.runtime.contains("pub struct Blok(i64);"));
    assert!(artifacts.runtime.contains("Blok(Blok),"));

    // One table record with selector fields, time, then columns.
    assert!(artifacts.runtime.contains("pub struct BlokVykon {"));
    assert!(artifacts.runtime.contains("pub Blok: Blok,"));
    assert!(artifacts.runtime.contains("pub Time: Time,"));
    assert!(artifacts.runtime.contains("pub pInst: f64,"));

    // Relational uniqueness constraint over the selector columns.
    assert!(artifacts
        .relational
        .contains("unique_together = [\"IdBlokDef\", \"Time\"]"));

    // One value-provider mapping keyed by the quantity name.
    assert!(artifacts
        .runtime
        .contains("BlokVykonpInst: HashMap<Selector, TimeSeriesDense<f64>>,"));
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let first = generate_from_str(INPUT).unwrap();
    let second = generate_from_str(INPUT).unwrap();

    assert_eq!(first.relational, second.relational);
    assert_eq!(first.runtime, second.runtime);
    assert_eq!(first.input_schema, second.input_schema);
}

#[test]
fn test_published_artifacts_match_rendered_artifacts() {
    let artifacts = generate_from_str(INPUT).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let writer = OutputWriter::new(dir.path());

    writer.publish(&artifacts).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join(RELATIONAL_FILE)).unwrap(),
        artifacts.relational
    );
    assert_eq!(
        fs::read_to_string(dir.path().join(RUNTIME_FILE)).unwrap(),
        artifacts.runtime
    );
    assert_eq!(
        fs::read_to_string(dir.path().join(INPUT_SCHEMA_FILE)).unwrap(),
        artifacts.input_schema
    );
}

#[test]
fn test_ghost_reference_aborts_before_any_output() {
    let broken = r#"{
        "entities": [],
        "tables": [
            {"name": "T", "selector": ["Ghost", "Time"], "time_repr": "Dense", "columns": []}
        ]
    }"#;
    let dir = tempfile::tempdir().unwrap();

    // The driver flow: render first, publish only on success.
    let result = generate_from_str(broken);
    match result {
        Err(GenerateError::Schema(SchemaError::UnknownEntity { field, .. })) => {
            assert_eq!(field, "Ghost");
        }
        other => panic!("expected UnknownEntity, got {other:?}"),
    }

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert!(entries.is_empty(), "no output may exist after a failed run");
}

#[test]
fn test_input_schema_document_describes_the_input() {
    let artifacts = generate_from_str(INPUT).unwrap();
    let schema: serde_json::Value = serde_json::from_str(&artifacts.input_schema).unwrap();

    assert_eq!(schema["title"], "QuantityDb");
    assert_eq!(schema["required"][0], "entities");
    assert_eq!(schema["required"][1], "tables");
}
