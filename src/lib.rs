//! # quantgen
//!
//! A schema-driven code generator for time-series quantity databases.
//!
//! ## Architecture
//!
//! One declarative description of a quantity database derives two
//! independent artifacts:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            quantities.json (input document)              │
//! │            (entities, tables, selectors)                 │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [loader]
//! ┌─────────────────────────────────────────────────────────┐
//! │                QuantityDb (resolved model)               │
//! └─────────────────────────────────────────────────────────┘
//!                │                         │
//!                ▼ [relational emitter]    ▼ [selector algebra
//! ┌──────────────────────────┐             │  + runtime emitter]
//! │  models.py               │  ┌──────────────────────────┐
//! │  (tables, foreign keys,  │  │  quantities.rs           │
//! │   uniqueness constraints)│  │  (records, selectors,    │
//! └──────────────────────────┘  │   value provider)        │
//!                │              └──────────────────────────┘
//!                ▼ [migration executor]
//! ┌─────────────────────────────────────────────────────────┐
//! │              live relational store                       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The generated runtime unit links against [`runtime`], which carries the
//! schema-independent pieces: the timestamp type, time-series storages,
//! replication tuple decoding, and the record traits.

pub mod config;
pub mod emit;
pub mod generate;
pub mod migrate;
pub mod model;
pub mod naming;
pub mod output;
pub mod runtime;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::emit::{emit_relational, emit_runtime};
    pub use crate::generate::{
        generate, generate_from_path, generate_from_str, Artifacts, GenerateError,
    };
    pub use crate::model::loader::{load_db, load_db_from_str, SchemaError};
    pub use crate::model::{
        canonical_selectors, Column, DataType, Entity, QuantityDb, SelField, Selector, Table,
        TimeRepr,
    };
    pub use crate::naming::Target;
}

// Also export the pipeline entry points at the crate root.
pub use generate::{generate, generate_from_path, generate_from_str, Artifacts};
pub use model::QuantityDb;
