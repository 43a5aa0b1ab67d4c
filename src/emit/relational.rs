//! The relational emitter.
//!
//! Builds one [`RelationalModel`] per entity and per table, then renders
//! the set as a Django-style model source unit. The IR keeps target syntax
//! out of the schema model and lets the field/constraint structure be
//! asserted on directly in tests.

use crate::emit::format::IndentWriter;
use crate::model::{DataType, Entity, QuantityDb, SelField, Table};
use crate::naming::{self, Target};

/// What kind of relational field a column renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain scalar column.
    Scalar(DataType),
    /// Foreign key into another model's table.
    ForeignKey { target_model: String },
    /// The time column.
    Timestamp,
}

/// One field of a relational model definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalField {
    /// Field and database column name.
    pub column_name: String,
    pub kind: FieldKind,
}

/// One model definition in the relational schema unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalModel {
    pub class_name: String,
    pub db_table: String,
    pub fields: Vec<RelationalField>,
    /// Ordered column names of the uniqueness constraint, when any.
    pub unique_together: Option<Vec<String>>,
}

/// Build the model definition of an entity: one scalar field per column,
/// table identifier `<EntityName>Def`.
pub fn entity_model(entity: &Entity) -> RelationalModel {
    let table_name = naming::entity_table_name(entity);
    let fields = entity
        .columns
        .iter()
        .map(|column| RelationalField {
            column_name: naming::column_field_name(column).to_string(),
            kind: FieldKind::Scalar(column.data_type),
        })
        .collect();

    RelationalModel {
        class_name: table_name.clone(),
        db_table: table_name,
        fields,
        unique_together: None,
    }
}

/// Build the model definition of a table: one field per selector component
/// (entity references as foreign keys, time as a timestamp), then one field
/// per column, with a uniqueness constraint over the selector's column
/// names in declaration order.
pub fn table_model(db: &QuantityDb, table: &Table) -> RelationalModel {
    let mut fields = Vec::new();
    for field in &table.selector.fields {
        let column_name = naming::selector_column_name(field);
        let kind = match field {
            SelField::Time => FieldKind::Timestamp,
            SelField::Entity { index, .. } => FieldKind::ForeignKey {
                target_model: naming::entity_table_name(db.entity(*index)),
            },
        };
        fields.push(RelationalField { column_name, kind });
    }
    for column in &table.columns {
        fields.push(RelationalField {
            column_name: naming::column_field_name(column).to_string(),
            kind: FieldKind::Scalar(column.data_type),
        });
    }

    let unique_together = table
        .selector
        .fields
        .iter()
        .map(naming::selector_column_name)
        .collect();

    RelationalModel {
        class_name: table.name.clone(),
        db_table: table.name.clone(),
        fields,
        unique_together: Some(unique_together),
    }
}

/// Render the whole relational schema unit.
pub fn emit_relational(db: &QuantityDb) -> String {
    let mut w = IndentWriter::new();
    w.write_line("from __future__ import annotations");
    w.blank_line();
    w.write_line("from django.db import models");
    w.blank_line();

    for entity in &db.entities {
        w.blank_line();
        render_model(&mut w, &entity_model(entity));
    }
    for table in &db.tables {
        w.blank_line();
        render_model(&mut w, &table_model(db, table));
    }

    w.into_string()
}

fn render_model(w: &mut IndentWriter, model: &RelationalModel) {
    w.write_line(&format!("class {}(models.Model):", model.class_name));
    w.indent();
    for field in &model.fields {
        w.write_line(&render_field(field));
    }
    w.blank_line();
    w.write_line("class Meta:");
    w.indent();
    w.write_line(&format!("db_table = \"{}\"", model.db_table));
    if let Some(unique) = &model.unique_together {
        let columns: Vec<String> = unique.iter().map(|c| format!("\"{c}\"")).collect();
        w.write_line(&format!("unique_together = [{}]", columns.join(", ")));
    }
    w.dedent();
    w.dedent();
}

fn render_field(field: &RelationalField) -> String {
    match &field.kind {
        FieldKind::Scalar(data_type) => format!(
            "{} = models.{}()",
            field.column_name,
            naming::target_type(*data_type, Target::Relational)
        ),
        FieldKind::ForeignKey { target_model } => format!(
            "{} = models.ForeignKey({}, db_column=\"{}\", on_delete=models.CASCADE)",
            field.column_name, target_model, field.column_name
        ),
        FieldKind::Timestamp => format!("{} = models.DateTimeField()", field.column_name),
    }
}
