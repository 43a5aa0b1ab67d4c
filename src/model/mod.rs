//! The in-memory schema model.
//!
//! Built once per generation run by the loader, fully resolved before any
//! emitter touches it, and discarded after emission. Entities and tables
//! live in ordered vectors so that every iteration a component performs is
//! declaration order, never incidental map order.

pub mod entity;
pub mod loader;
pub mod schema;
pub mod selector;
pub mod table;
pub mod types;

pub use entity::{Column, Entity};
pub use selector::{canonical_selectors, SelField, Selector};
pub use table::Table;
pub use types::{DataType, TimeRepr};

/// The root aggregate: a database of quantities.
///
/// Invariant (established by the loader): every non-time selector field of
/// every table resolves to an entity in `entities`, and entity and table
/// names are unique within their respective namespaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityDb {
    pub entities: Vec<Entity>,
    pub tables: Vec<Table>,
}

impl QuantityDb {
    /// The entity a resolved selector field points at.
    pub fn entity(&self, index: usize) -> &Entity {
        &self.entities[index]
    }
}
