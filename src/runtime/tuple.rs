//! Replication tuples and positional row decoding.
//!
//! A replication tuple is the positional payload of one changed row from a
//! change-data-capture stream, in the text protocol: every cell is either
//! null or the textual rendering of the column value. Persisted rows read
//! back through a [`RowStore`] use the same cell shape, so one decoder
//! serves both paths.

use crate::runtime::time::Time;
use crate::runtime::DecodeError;

/// One cell of a replication tuple or persisted row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    Null,
    Text(String),
}

impl ColumnValue {
    pub fn as_str(&self) -> Result<&str, DecodeError> {
        match self {
            ColumnValue::Text(s) => Ok(s),
            ColumnValue::Null => Err(DecodeError::Malformed {
                message: "unexpected null column value".to_string(),
            }),
        }
    }
}

/// A positional row of cells, in the relational field order of its table.
pub type Row = Vec<ColumnValue>;

/// The positional payload of one changed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleData {
    pub columns: Row,
}

impl TupleData {
    pub fn new(columns: Row) -> Self {
        Self { columns }
    }

    /// Build a tuple from textual cells (convenient for tests and hosts
    /// speaking the text protocol).
    pub fn from_text<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: cells
                .into_iter()
                .map(|s| ColumnValue::Text(s.into()))
                .collect(),
        }
    }
}

/// Access to the persisted relational rows of a quantity database. The
/// generated loading routine pulls each table's rows through this.
pub trait RowStore {
    fn rows(&self, table_name: &str) -> Vec<Row>;
}

/// Decoding one cell into a runtime value.
pub trait Decode: Sized {
    fn decode(value: &ColumnValue) -> Result<Self, DecodeError>;
}

/// An opaque entity identifier: a 64-bit id newtype generated per entity.
pub trait EntityRef {
    fn entity_name() -> &'static str;
    fn id(&self) -> i64;
    fn from_entity_id(id: i64) -> Self;
}

impl<T: EntityRef> Decode for T {
    fn decode(value: &ColumnValue) -> Result<Self, DecodeError> {
        Ok(Self::from_entity_id(Decode::decode(value)?))
    }
}

impl Decode for i64 {
    fn decode(value: &ColumnValue) -> Result<Self, DecodeError> {
        value.as_str()?.parse().map_err(DecodeError::malformed)
    }
}

impl Decode for f64 {
    fn decode(value: &ColumnValue) -> Result<Self, DecodeError> {
        value.as_str()?.parse().map_err(DecodeError::malformed)
    }
}

impl Decode for String {
    fn decode(value: &ColumnValue) -> Result<Self, DecodeError> {
        Ok(value.as_str()?.to_string())
    }
}

impl Decode for Time {
    fn decode(value: &ColumnValue) -> Result<Self, DecodeError> {
        let s = value.as_str()?;
        // Persisted rows carry epoch seconds; replication streams render
        // timestamps as "YYYY-MM-DD HH:MM:SS[.f][+TZ]".
        if let Ok(epoch) = s.parse::<i64>() {
            return Ok(Time(epoch));
        }
        let format = if s.contains('+') {
            "%Y-%m-%d %H:%M:%S%.f%#z"
        } else {
            "%Y-%m-%d %H:%M:%S%.f"
        };
        let dt = chrono::NaiveDateTime::parse_from_str(s, format)
            .map_err(DecodeError::malformed)?;
        Ok(Time::from_naive_datetime(dt))
    }
}
