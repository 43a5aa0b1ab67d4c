//! Entities and their columns.

use crate::model::types::DataType;

/// A named scalar column. Belongs to exactly one entity or table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
}

/// A reference-able dimension (a physical unit, an asset) with its own
/// defining columns. Entity names are unique within a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub columns: Vec<Column>,
}
