//! Machine-checkable description of the input document shape.
//!
//! The generator is self-describing: the JSON Schema written alongside the
//! artifacts is assembled from the same shapes the loader accepts, so the
//! two cannot drift apart silently.

use serde_json::{json, Value};

use crate::model::{DataType, TimeRepr};

/// JSON Schema of the `quantities.json` input document.
pub fn input_schema() -> Value {
    let data_types: Vec<&str> = [DataType::Int, DataType::Float, DataType::Text]
        .iter()
        .map(DataType::raw_str)
        .collect();
    let time_reprs: Vec<&str> = [TimeRepr::Changes, TimeRepr::Dense, TimeRepr::Interval]
        .iter()
        .map(TimeRepr::as_str)
        .collect();

    let column = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "data_type": { "type": "string", "enum": data_types }
        },
        "required": ["name", "data_type"],
        "additionalProperties": false
    });

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "QuantityDb",
        "description": "Database of quantities.",
        "type": "object",
        "properties": {
            "entities": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "columns": { "type": "array", "items": column.clone() }
                    },
                    "required": ["name", "columns"],
                    "additionalProperties": false
                }
            },
            "tables": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "selector": {
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "time_repr": { "type": "string", "enum": time_reprs },
                        "columns": { "type": "array", "items": column }
                    },
                    "required": ["name", "selector", "time_repr", "columns"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["entities", "tables"],
        "additionalProperties": false
    })
}
