//! Selectors: the ordered key shape of a table, and the algebra that
//! canonicalizes the distinct shapes used across a schema.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::model::QuantityDb;

/// One component of a selector: the distinguished time field, or a
/// reference to an entity.
///
/// Entity fields carry the position of the entity in
/// [`QuantityDb::entities`], resolved eagerly by the loader so that no
/// later component performs a name lookup.
///
/// Equality, ordering and hashing are all by the referenced name (the time
/// field spells `"Time"`), never by the resolved index.
#[derive(Debug, Clone)]
pub enum SelField {
    Time,
    Entity { name: String, index: usize },
}

impl SelField {
    pub fn is_time(&self) -> bool {
        matches!(self, SelField::Time)
    }

    /// The field name as it appears in the input document.
    pub fn name(&self) -> &str {
        match self {
            SelField::Time => "Time",
            SelField::Entity { name, .. } => name,
        }
    }

    /// The resolved entity position, `None` for the time field.
    pub fn entity_index(&self) -> Option<usize> {
        match self {
            SelField::Time => None,
            SelField::Entity { index, .. } => Some(*index),
        }
    }
}

impl PartialEq for SelField {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for SelField {}

impl PartialOrd for SelField {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SelField {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl Hash for SelField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

/// An ordered sequence of selector fields, always ending in the time field.
///
/// Two selectors are structurally equal iff their field-name sequences are
/// equal; the total order is lexicographic over those sequences.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector {
    pub fields: Vec<SelField>,
}

impl Selector {
    /// Every field except the trailing time field, in declared order.
    pub fn non_time_fields(&self) -> &[SelField] {
        &self.fields[..self.fields.len() - 1]
    }

    /// The canonical variant name of this selector shape: the raw names of
    /// all non-time fields concatenated in order, or `Unit` when there are
    /// none.
    pub fn variant_name(&self) -> String {
        let non_time = self.non_time_fields();
        if non_time.is_empty() {
            return "Unit".to_string();
        }
        non_time.iter().map(SelField::name).collect()
    }
}

/// The canonical, deduplicated, totally ordered set of distinct selector
/// shapes used across all tables.
///
/// Deduplication is by structural equality; the result is sorted by the
/// lexicographic order of the field-name sequences, so the output never
/// depends on table declaration order.
///
/// Panics when two distinct shapes canonicalize to the same variant name.
/// Distinct field sequences almost always concatenate distinctly; when they
/// do not, the schema cannot be represented and continuing would silently
/// merge two selector types.
pub fn canonical_selectors(db: &QuantityDb) -> Vec<Selector> {
    let mut selectors: Vec<Selector> = Vec::new();
    for table in &db.tables {
        if !selectors.contains(&table.selector) {
            selectors.push(table.selector.clone());
        }
    }
    selectors.sort();

    for pair in selectors.windows(2) {
        if pair[0].variant_name() == pair[1].variant_name() {
            panic!(
                "selector variant name collision: distinct selectors {:?} and {:?} both canonicalize to '{}'",
                field_names(&pair[0]),
                field_names(&pair[1]),
                pair[0].variant_name()
            );
        }
    }

    selectors
}

fn field_names(selector: &Selector) -> Vec<&str> {
    selector.fields.iter().map(SelField::name).collect()
}
