//! Loading the input document into a resolved [`QuantityDb`].
//!
//! The loader owns every structural check: scalar-kind mapping, selector
//! shape, name uniqueness, and the eager resolution of selector fields to
//! entities. On success the model is fully linked; on failure no partial
//! model escapes.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{Column, DataType, Entity, QuantityDb, SelField, Selector, Table, TimeRepr};
use crate::naming;

/// Errors rejecting a structurally invalid input document.
///
/// Every variant carries enough context (table name, field name) to point
/// at the offending declaration.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// IO error reading the document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed document: missing required fields or wrong shapes
    #[error("invalid input document: {message}")]
    Parse { message: String },

    /// A column declares a scalar kind with no mapping
    #[error("unsupported data type '{type_name}' for column '{column}' in {context}")]
    UnsupportedType {
        type_name: String,
        column: String,
        context: String,
    },

    /// A table declares an unknown time representation
    #[error("unsupported time representation '{value}' in table '{table}'")]
    UnsupportedTimeRepr { value: String, table: String },

    /// A declared name is not a valid identifier in the emission targets
    #[error("invalid {kind} name '{name}': not a valid identifier")]
    InvalidName { kind: &'static str, name: String },

    /// Duplicate entity or table name
    #[error("duplicate {kind} name: '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    /// A selector field names an entity absent from `entities`
    #[error("table '{table}' selector field '{field}' does not match any declared entity")]
    UnknownEntity { table: String, field: String },

    /// A selector does not end with the time field
    #[error("table '{table}' selector must end with the time field")]
    MissingTimeField { table: String },

    /// The time field appears before the end of a selector
    #[error("table '{table}' selector places the time field before the end")]
    MisplacedTimeField { table: String },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, SchemaError>;

// Raw document shapes, exactly as they appear on disk. Resolution and
// validation happen in a second pass over these.

#[derive(Debug, Deserialize)]
struct RawDb {
    entities: Vec<RawEntity>,
    tables: Vec<RawTable>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    name: String,
    columns: Vec<RawColumn>,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    name: String,
    data_type: String,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    name: String,
    selector: Vec<String>,
    time_repr: String,
    columns: Vec<RawColumn>,
}

/// Load a quantity database from a JSON file.
pub fn load_db(path: &Path) -> LoadResult<QuantityDb> {
    let content = std::fs::read_to_string(path)?;
    load_db_from_str(&content)
}

/// Load a quantity database from a JSON string (useful for testing).
pub fn load_db_from_str(content: &str) -> LoadResult<QuantityDb> {
    let raw: RawDb = serde_json::from_str(content).map_err(|e| SchemaError::Parse {
        message: e.to_string(),
    })?;
    resolve(raw)
}

fn resolve(raw: RawDb) -> LoadResult<QuantityDb> {
    let mut entities = Vec::with_capacity(raw.entities.len());
    let mut entity_index: HashMap<String, usize> = HashMap::new();

    for raw_entity in raw.entities {
        check_name("entity", &raw_entity.name)?;
        if entity_index.contains_key(&raw_entity.name) {
            return Err(SchemaError::DuplicateName {
                kind: "entity",
                name: raw_entity.name,
            });
        }
        let columns = resolve_columns(raw_entity.columns, &format!("entity '{}'", raw_entity.name))?;
        entity_index.insert(raw_entity.name.clone(), entities.len());
        entities.push(Entity {
            name: raw_entity.name,
            columns,
        });
    }

    let mut tables = Vec::with_capacity(raw.tables.len());
    let mut table_names: HashSet<String> = HashSet::new();

    for raw_table in raw.tables {
        check_name("table", &raw_table.name)?;
        if !table_names.insert(raw_table.name.clone()) {
            return Err(SchemaError::DuplicateName {
                kind: "table",
                name: raw_table.name,
            });
        }
        let selector = resolve_selector(&raw_table.name, &raw_table.selector, &entity_index)?;
        let time_repr =
            TimeRepr::parse(&raw_table.time_repr).ok_or_else(|| SchemaError::UnsupportedTimeRepr {
                value: raw_table.time_repr.clone(),
                table: raw_table.name.clone(),
            })?;
        let columns = resolve_columns(raw_table.columns, &format!("table '{}'", raw_table.name))?;
        tables.push(Table {
            name: raw_table.name,
            selector,
            time_repr,
            columns,
        });
    }

    Ok(QuantityDb { entities, tables })
}

fn resolve_columns(raw: Vec<RawColumn>, context: &str) -> LoadResult<Vec<Column>> {
    let mut columns = Vec::with_capacity(raw.len());
    for raw_column in raw {
        check_name("column", &raw_column.name)?;
        let data_type =
            DataType::parse(&raw_column.data_type).ok_or_else(|| SchemaError::UnsupportedType {
                type_name: raw_column.data_type.clone(),
                column: raw_column.name.clone(),
                context: context.to_string(),
            })?;
        columns.push(Column {
            name: raw_column.name,
            data_type,
        });
    }
    Ok(columns)
}

fn resolve_selector(
    table: &str,
    raw: &[String],
    entity_index: &HashMap<String, usize>,
) -> LoadResult<Selector> {
    match raw.last() {
        Some(last) if last == "Time" => {}
        _ => {
            return Err(SchemaError::MissingTimeField {
                table: table.to_string(),
            })
        }
    }

    let mut fields = Vec::with_capacity(raw.len());
    for (position, name) in raw.iter().enumerate() {
        if name == "Time" {
            if position != raw.len() - 1 {
                return Err(SchemaError::MisplacedTimeField {
                    table: table.to_string(),
                });
            }
            fields.push(SelField::Time);
        } else {
            let index = *entity_index
                .get(name)
                .ok_or_else(|| SchemaError::UnknownEntity {
                    table: table.to_string(),
                    field: name.clone(),
                })?;
            fields.push(SelField::Entity {
                name: name.clone(),
                index,
            });
        }
    }

    Ok(Selector { fields })
}

fn check_name(kind: &'static str, name: &str) -> LoadResult<()> {
    if naming::is_valid_identifier(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}
