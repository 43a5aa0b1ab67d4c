use quantgen::emit::runtime::emit_runtime;
use quantgen::model::loader::load_db_from_str;
use quantgen::model::QuantityDb;

fn fixture() -> QuantityDb {
    load_db_from_str(
        r#"{
            "entities": [
                {"name": "Blok", "columns": [{"name": "Jmeno", "data_type": "string"}]},
                {"name": "Stroj", "columns": []}
            ],
            "tables": [
                {
                    "name": "Teplota",
                    "selector": ["Blok", "Stroj", "Time"],
                    "time_repr": "Changes",
                    "columns": [{"name": "tC", "data_type": "float"}]
                },
                {
                    "name": "Pocet",
                    "selector": ["Time"],
                    "time_repr": "Dense",
                    "columns": [{"name": "n", "data_type": "int"}]
                },
                {
                    "name": "Poznamka",
                    "selector": ["Blok", "Time"],
                    "time_repr": "Dense",
                    "columns": [{"name": "txt", "data_type": "string"}]
                }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_one_identifier_type_per_entity() {
    let out = emit_runtime(&fixture());
    assert!(out.contains("pub struct Blok(i64);"));
    assert!(out.contains("pub struct Stroj(i64);"));
    assert!(out.contains("impl EntityRef for Stroj {"));
}

#[test]
fn test_selector_enum_covers_all_shapes_in_canonical_order() {
    let out = emit_runtime(&fixture());
    let enum_pos = out.find("pub enum Selector {").unwrap();
    let enum_body = &out[enum_pos..out[enum_pos..].find('}').unwrap() + enum_pos];

    let blokstroj = enum_body.find("BlokStroj(Blok, Stroj),").unwrap();
    let blok = enum_body.find("Blok(Blok),").unwrap();
    let unit = enum_body.find("Unit(()),").unwrap();
    // Lexicographic field-name order: [Blok, Stroj, Time] < [Blok, Time] < [Time].
    assert!(blokstroj < blok);
    assert!(blok < unit);
}

#[test]
fn test_tables_with_same_shape_share_the_variant() {
    let db = load_db_from_str(
        r#"{
            "entities": [{"name": "Blok", "columns": []}],
            "tables": [
                {"name": "A", "selector": ["Blok", "Time"], "time_repr": "Dense",
                 "columns": [{"name": "x", "data_type": "float"}]},
                {"name": "B", "selector": ["Blok", "Time"], "time_repr": "Dense",
                 "columns": [{"name": "y", "data_type": "float"}]}
            ]
        }"#,
    )
    .unwrap();
    let out = emit_runtime(&db);

    // One variant, used by both records.
    assert_eq!(out.matches("Blok(Blok),").count(), 1);
    assert_eq!(out.matches("Selector::Blok(self.Blok)").count(), 2);
}

#[test]
fn test_multi_field_selector_payload_order() {
    let out = emit_runtime(&fixture());
    assert!(out.contains("Selector::BlokStroj(self.Blok, self.Stroj)"));
}

#[test]
fn test_storage_types_follow_time_repr_and_scalar() {
    let out = emit_runtime(&fixture());
    assert!(out.contains("TeplotatC: HashMap<Selector, TimeSeriesChanges<f64>>,"));
    assert!(out.contains("Pocetn: HashMap<Selector, TimeSeriesDense<i64>>,"));
    assert!(out.contains("Poznamkatxt: HashMap<Selector, TimeSeriesDense<String>>,"));
}

#[test]
fn test_value_kinds_follow_column_scalar() {
    let out = emit_runtime(&fixture());
    assert!(out.contains("(\"Pocetn\", Value::Int(self.n)),"));
    assert!(out.contains("(\"Poznamkatxt\", Value::Text(self.txt.clone())),"));
    assert!(out.contains(".set(&t, value.as_int()),"));
    assert!(out.contains(".set(&t, value.into_text()),"));
    assert!(out.contains(".get(t).map(Value::Int),"));
    assert!(out.contains(".get(t).map(Value::Text),"));
}

#[test]
fn test_accessors_return_the_column_scalar() {
    let out = emit_runtime(&fixture());
    assert!(out.contains(
        "pub fn tC(vp: &ValueProvider, blok: Blok, stroj: Stroj, t: Time) -> f64 {"
    ));
    assert!(out.contains("pub fn n(vp: &ValueProvider, t: Time) -> i64 {"));
    assert!(out.contains("pub fn txt(vp: &ValueProvider, blok: Blok, t: Time) -> String {"));
    assert!(out.contains("vp.get(\"Pocetn\", &Selector::Unit(()), &t).as_int()"));
}

#[test]
fn test_arity_checks_count_selector_plus_columns() {
    let out = emit_runtime(&fixture());
    // Teplota: 3 selector fields + 1 column.
    assert!(out.contains("if row.len() != 4 {"));
    // Pocet: 1 selector field + 1 column.
    assert!(out.contains("if row.len() != 2 {"));
}

#[test]
fn test_metadata_reflects_relational_layout() {
    let out = emit_runtime(&fixture());
    assert!(out.contains("vec![\"Blok\", \"Stroj\"]"));
    assert!(out.contains("vec![\"tC\"]"));
    assert!(out.contains(
        r##"r#"SELECT "IdBlokDef", "IdStrojDef", EXTRACT(EPOCH FROM "Time")::BIGINT AS "Time", "tC" FROM "Teplota""#"##
    ));
}

#[test]
fn test_unknown_table_dispatch_arm_is_last() {
    let out = emit_runtime(&fixture());
    let dispatch = out.find("pub fn from_tuple_data(relation_name: &str").unwrap();
    let teplota = out[dispatch..].find("\"Teplota\" =>").unwrap();
    let unknown = out[dispatch..].find("table => Err(RuntimeError::UnknownTable {").unwrap();
    assert!(teplota < unknown);
}

#[test]
fn test_emission_is_deterministic() {
    let db = fixture();
    assert_eq!(emit_runtime(&db), emit_runtime(&db));
}
