//! Scalar kinds and time-representation tags.

/// Abstract scalar kind of a column.
///
/// Mapping to a concrete type spelling is the job of [`crate::naming`];
/// the kind itself carries no target-specific behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Float,
    Text,
}

impl DataType {
    /// Parse the raw spelling used in the input document.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "int" => Some(DataType::Int),
            "float" => Some(DataType::Float),
            "string" => Some(DataType::Text),
            _ => None,
        }
    }

    /// The raw spelling as it appears in the input document.
    pub fn raw_str(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Text => "string",
        }
    }
}

/// How a table's time series stores and interpolates values.
///
/// The generator treats this as an opaque tag: it selects the storage type
/// spelled into the runtime unit and nothing else. Interpolation semantics
/// belong to the runtime's storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeRepr {
    Changes,
    Dense,
    Interval,
}

impl TimeRepr {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Changes" => Some(TimeRepr::Changes),
            "Dense" => Some(TimeRepr::Dense),
            "Interval" => Some(TimeRepr::Interval),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRepr::Changes => "Changes",
            TimeRepr::Dense => "Dense",
            TimeRepr::Interval => "Interval",
        }
    }
}
