//! Tables: measurement streams keyed by (selector, time).

use crate::model::entity::Column;
use crate::model::selector::Selector;
use crate::model::types::TimeRepr;

/// A measurement stream. Rows are logically keyed by the selector's
/// non-time fields plus time, enforced as a uniqueness constraint by the
/// relational emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub selector: Selector,
    pub time_repr: TimeRepr,
    pub columns: Vec<Column>,
}
