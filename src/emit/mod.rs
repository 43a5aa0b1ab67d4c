//! Emission of the two target source units.
//!
//! Both emitters consume the same resolved [`crate::model::QuantityDb`] and
//! share the naming tables in [`crate::naming`]; neither mutates the model.

pub mod format;
pub mod relational;
pub mod runtime;

pub use relational::emit_relational;
pub use runtime::emit_runtime;
