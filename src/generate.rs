//! End-to-end generation from an input document to the emitted artifacts.
//!
//! ```text
//! quantities.json → load → QuantityDb → emit relational + runtime + schema
//! ```
//!
//! Every artifact is rendered in memory; nothing touches disk here. A run
//! either yields all artifacts or fails before any output exists, which is
//! what lets the output writer publish atomically.

use std::path::Path;

use tracing::{debug, info};

use crate::emit::{emit_relational, emit_runtime};
use crate::model::loader::{self, SchemaError};
use crate::model::{schema, QuantityDb};

/// Errors that can occur during a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GenerateResult<T> = Result<T, GenerateError>;

/// File name of the relational schema unit.
pub const RELATIONAL_FILE: &str = "models.py";
/// File name of the runtime source unit.
pub const RUNTIME_FILE: &str = "quantities.rs";
/// File name of the input-document JSON Schema.
pub const INPUT_SCHEMA_FILE: &str = "quantities.schema.json";

/// The rendered artifacts of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub relational: String,
    pub runtime: String,
    pub input_schema: String,
}

/// Render all artifacts from a resolved model.
pub fn generate(db: &QuantityDb) -> Artifacts {
    debug!("emitting relational schema unit");
    let relational = emit_relational(db);
    debug!("emitting runtime source unit");
    let runtime = emit_runtime(db);
    let input_schema = serde_json::to_string_pretty(&schema::input_schema())
        .expect("input schema serializes to JSON");

    Artifacts {
        relational,
        runtime,
        input_schema,
    }
}

/// Load an input document from disk and render all artifacts.
pub fn generate_from_path(path: &Path) -> GenerateResult<Artifacts> {
    let db = loader::load_db(path)?;
    info!(
        entities = db.entities.len(),
        tables = db.tables.len(),
        "loaded quantity database"
    );
    Ok(generate(&db))
}

/// Render all artifacts from an input document string.
pub fn generate_from_str(content: &str) -> GenerateResult<Artifacts> {
    let db = loader::load_db_from_str(content)?;
    Ok(generate(&db))
}
