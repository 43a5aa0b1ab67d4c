//! Support library for the generated runtime source unit.
//!
//! The runtime emitter writes a source unit that links against this
//! module: the timestamp type, the time-series storages, replication tuple
//! decoding, the record traits, and the runtime error taxonomy. Nothing in
//! here depends on any particular schema.

pub mod series;
pub mod time;
pub mod tuple;

pub use series::{TimeSeriesChanges, TimeSeriesDense, TimeSeriesInterval};
pub use time::Time;
pub use tuple::{ColumnValue, Decode, EntityRef, Row, RowStore, TupleData};

use thiserror::Error;

/// Failures decoding a positional row or replication tuple. These surface
/// to the runtime's caller as recoverable results.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A tuple's arity disagrees with the table's declared column count
    #[error("unexpected number of columns: actual: {actual}, expected: {expected}")]
    UnexpectedColumnCount { actual: usize, expected: usize },

    /// A cell could not be decoded into its column's scalar type
    #[error("malformed column value: {message}")]
    Malformed { message: String },
}

impl DecodeError {
    pub fn malformed(error: impl std::fmt::Display) -> Self {
        DecodeError::Malformed {
            message: error.to_string(),
        }
    }
}

/// Failures dispatching replication events to table records.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A replication event names a relation the schema does not know
    #[error("unknown table: {table}")]
    UnknownTable { table: String },
}

/// A scalar value carried by a quantity.
///
/// The typed accessors are deliberately fatal on a kind mismatch: the
/// generated code pairs every quantity name with its column's scalar type,
/// so a mismatch means the generator and its generated code disagree, the
/// same failure class as an unknown quantity name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Int(v) => *v,
            other => panic!("expected int value, got {other:?}"),
        }
    }

    pub fn as_float(&self) -> f64 {
        match self {
            Value::Float(v) => *v,
            other => panic!("expected float value, got {other:?}"),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Value::Text(v) => v,
            other => panic!("expected text value, got {other:?}"),
        }
    }
}

/// Static description of a generated table record: its relation name and
/// the column layout shared with the relational schema.
pub trait TableMetadata: Sized {
    fn table_name() -> &'static str;
    fn selector_names() -> Vec<&'static str>;
    fn column_names() -> Vec<&'static str>;
    fn select_sql() -> &'static str;
}

/// The per-row operations every generated table record exposes.
pub trait TableValues<Selector> {
    fn time(&self) -> Time;
    fn selector(&self) -> Selector;
    fn values(&self) -> Vec<(&'static str, Value)>;
}

/// Decoding a record from a replication tuple.
pub trait FromTupleData: Sized {
    fn from_tuple_data(tuple: &TupleData) -> Result<Self, DecodeError>;
}
