//! Naming conventions and type mappings shared by both emitters.
//!
//! Pure lookup tables, no state. Any field that is structurally shared
//! between the relational and the runtime target (the time column, entity
//! reference columns) must go through the same function here, so the
//! relational uniqueness constraint and the runtime decode order agree
//! field-for-field.

use crate::model::{Column, DataType, Entity, SelField, Table};

/// An emission target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The relational schema unit (Django model definitions).
    Relational,
    /// The runtime source unit (Rust).
    Runtime,
}

/// The concrete type spelling for a scalar kind in the given target.
pub fn target_type(data_type: DataType, target: Target) -> &'static str {
    match target {
        Target::Relational => match data_type {
            DataType::Int => "IntegerField",
            DataType::Float => "FloatField",
            DataType::Text => "TextField",
        },
        Target::Runtime => match data_type {
            DataType::Int => "i64",
            DataType::Float => "f64",
            DataType::Text => "String",
        },
    }
}

/// The field name a column gets in emitted code. Columns keep their raw
/// names in both targets.
pub fn column_field_name(column: &Column) -> &str {
    &column.name
}

/// The column name a selector field gets in the relational schema: the
/// reserved `Time` for the time field, `Id<Entity>Def` for entity fields.
pub fn selector_column_name(field: &SelField) -> String {
    match field {
        SelField::Time => "Time".to_string(),
        SelField::Entity { name, .. } => format!("Id{name}Def"),
    }
}

/// The relational table identifier of an entity.
pub fn entity_table_name(entity: &Entity) -> String {
    format!("{}Def", entity.name)
}

/// The quantity name of a table column: `<TableName><ColumnName>`. These
/// are the keys of the generated value-provider registry.
pub fn quantity_name(table: &Table, column: &Column) -> String {
    format!("{}{}", table.name, column.name)
}

/// The argument name a selector field gets in generated accessor
/// functions.
pub fn selector_var_name(field: &SelField) -> String {
    field.name().to_lowercase()
}

/// Whether a declared name is usable as an identifier in both emission
/// targets: ASCII alphanumeric/underscore, not starting with a digit.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
