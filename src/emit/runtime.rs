//! The runtime emitter.
//!
//! Renders the Rust source unit: entity identifier types, per-table record
//! types with row- and replication-tuple decoding, the tagged union over
//! tables, the shared selector enumeration, the value-provider registry and
//! its loading routine, plus per-table accessor modules and a prelude.
//!
//! The emitted unit links against [`crate::runtime`]. Field order inside a
//! record (selector fields, then time, then columns) matches the relational
//! emitter's field order exactly; the positional decoders rely on it.

use crate::emit::format::IndentWriter;
use crate::model::{
    canonical_selectors, Column, DataType, Entity, QuantityDb, SelField, Selector, Table, TimeRepr,
};
use crate::naming::{self, Target};

/// Render the whole runtime source unit.
pub fn emit_runtime(db: &QuantityDb) -> String {
    let selectors = canonical_selectors(db);

    let mut w = IndentWriter::new();
    emit_header(&mut w);
    for entity in &db.entities {
        emit_entity(&mut w, entity);
    }
    emit_tables_mod(&mut w, db);
    emit_table_enum(&mut w, db);
    emit_selector_enum(&mut w, &selectors);
    emit_value_provider(&mut w, db);
    emit_loader(&mut w, db);
    for table in &db.tables {
        emit_accessor_mod(&mut w, table);
    }
    emit_prelude(&mut w, db);
    w.into_string()
}

fn emit_header(w: &mut IndentWriter) {
    w.write_line("// Generated by quantgen. Do not edit.");
    w.write_line("#![allow(non_snake_case, dead_code, unused_imports)]");
    w.blank_line();
    w.write_line("use std::collections::HashMap;");
    w.blank_line();
    w.write_line("use quantgen::runtime::{");
    w.indent();
    w.write_line("ColumnValue, Decode, DecodeError, EntityRef, FromTupleData, Row, RowStore,");
    w.write_line("RuntimeError, TableMetadata, TableValues, Time, TimeSeriesChanges,");
    w.write_line("TimeSeriesDense, TimeSeriesInterval, TupleData, Value,");
    w.dedent();
    w.write_line("};");
}

fn emit_entity(w: &mut IndentWriter, entity: &Entity) {
    w.blank_line();
    w.write_line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]");
    w.write_line(&format!("pub struct {}(i64);", entity.name));
    w.blank_line();
    w.write_line(&format!("impl EntityRef for {} {{", entity.name));
    w.indent();
    w.write_line("fn entity_name() -> &'static str {");
    w.indent();
    w.write_line(&format!("\"{}\"", entity.name));
    w.dedent();
    w.write_line("}");
    w.blank_line();
    w.write_line("fn id(&self) -> i64 {");
    w.indent();
    w.write_line("self.0");
    w.dedent();
    w.write_line("}");
    w.blank_line();
    w.write_line("fn from_entity_id(id: i64) -> Self {");
    w.indent();
    w.write_line("Self(id)");
    w.dedent();
    w.write_line("}");
    w.dedent();
    w.write_line("}");

    // Companion definition record: the entity's own columns.
    w.blank_line();
    w.write_line("#[derive(Debug, Clone)]");
    w.write_line(&format!("pub struct {} {{", naming::entity_table_name(entity)));
    w.indent();
    for column in &entity.columns {
        w.write_line(&format!(
            "pub {}: {},",
            naming::column_field_name(column),
            naming::target_type(column.data_type, Target::Runtime)
        ));
    }
    w.dedent();
    w.write_line("}");
    w.blank_line();
    w.write_line(&format!("impl {} {{", naming::entity_table_name(entity)));
    w.indent();
    w.write_line("pub fn select_sql() -> &'static str {");
    w.indent();
    w.write_line(&format!("r#\"{}\"#", entity_select_sql(entity)));
    w.dedent();
    w.write_line("}");
    w.dedent();
    w.write_line("}");
}

fn emit_tables_mod(w: &mut IndentWriter, db: &QuantityDb) {
    w.blank_line();
    w.write_line("pub mod tables {");
    w.indent();
    w.write_line("use super::*;");
    for table in &db.tables {
        emit_table_record(w, table);
    }
    w.dedent();
    w.write_line("}");
}

fn emit_table_record(w: &mut IndentWriter, table: &Table) {
    let arity = table.selector.fields.len() + table.columns.len();

    w.blank_line();
    w.write_line("#[derive(Debug, Clone)]");
    w.write_line(&format!("pub struct {} {{", table.name));
    w.indent();
    w.write_line("// Selectors");
    for field in &table.selector.fields {
        w.write_line(&format!("pub {}: {},", field.name(), selector_field_type(field)));
    }
    w.blank_line();
    w.write_line("// Columns");
    for column in &table.columns {
        w.write_line(&format!(
            "pub {}: {},",
            naming::column_field_name(column),
            naming::target_type(column.data_type, Target::Runtime)
        ));
    }
    w.dedent();
    w.write_line("}");

    // Positional row decoding, in the relational field order.
    w.blank_line();
    w.write_line(&format!("impl {} {{", table.name));
    w.indent();
    w.write_line("pub fn from_row(row: &Row) -> Result<Self, DecodeError> {");
    w.indent();
    w.write_line(&format!("if row.len() != {arity} {{"));
    w.indent();
    w.write_line("return Err(DecodeError::UnexpectedColumnCount {");
    w.indent();
    w.write_line("actual: row.len(),");
    w.write_line(&format!("expected: {arity},"));
    w.dedent();
    w.write_line("});");
    w.dedent();
    w.write_line("}");
    w.write_line("Ok(Self {");
    w.indent();
    let mut position = 0usize;
    for field in &table.selector.fields {
        w.write_line(&format!(
            "{}: Decode::decode(&row[{position}])?,",
            field.name()
        ));
        position += 1;
    }
    for column in &table.columns {
        w.write_line(&format!(
            "{}: Decode::decode(&row[{position}])?,",
            naming::column_field_name(column)
        ));
        position += 1;
    }
    w.dedent();
    w.write_line("})");
    w.dedent();
    w.write_line("}");
    w.dedent();
    w.write_line("}");

    w.blank_line();
    w.write_line(&format!("impl TableMetadata for {} {{", table.name));
    w.indent();
    w.write_line("fn table_name() -> &'static str {");
    w.indent();
    w.write_line(&format!("\"{}\"", table.name));
    w.dedent();
    w.write_line("}");
    w.blank_line();
    w.write_line("fn selector_names() -> Vec<&'static str> {");
    w.indent();
    let selector_names: Vec<String> = table
        .selector
        .non_time_fields()
        .iter()
        .map(|f| format!("\"{}\"", f.name()))
        .collect();
    w.write_line(&format!("vec![{}]", selector_names.join(", ")));
    w.dedent();
    w.write_line("}");
    w.blank_line();
    w.write_line("fn column_names() -> Vec<&'static str> {");
    w.indent();
    let column_names: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("\"{}\"", c.name))
        .collect();
    w.write_line(&format!("vec![{}]", column_names.join(", ")));
    w.dedent();
    w.write_line("}");
    w.blank_line();
    w.write_line("fn select_sql() -> &'static str {");
    w.indent();
    w.write_line(&format!("r#\"{}\"#", table_select_sql(table)));
    w.dedent();
    w.write_line("}");
    w.dedent();
    w.write_line("}");

    w.blank_line();
    w.write_line(&format!("impl FromTupleData for {} {{", table.name));
    w.indent();
    w.write_line("fn from_tuple_data(tuple: &TupleData) -> Result<Self, DecodeError> {");
    w.indent();
    w.write_line("Self::from_row(&tuple.columns)");
    w.dedent();
    w.write_line("}");
    w.dedent();
    w.write_line("}");

    w.blank_line();
    w.write_line(&format!("impl TableValues<Selector> for {} {{", table.name));
    w.indent();
    w.write_line("fn time(&self) -> Time {");
    w.indent();
    w.write_line("self.Time");
    w.dedent();
    w.write_line("}");
    w.blank_line();
    w.write_line("fn selector(&self) -> Selector {");
    w.indent();
    w.write_line(&format!(
        "Selector::{}({})",
        table.selector.variant_name(),
        selector_payload_expr(&table.selector, "self.")
    ));
    w.dedent();
    w.write_line("}");
    w.blank_line();
    w.write_line("fn values(&self) -> Vec<(&'static str, Value)> {");
    w.indent();
    w.write_line("vec![");
    w.indent();
    for column in &table.columns {
        w.write_line(&format!(
            "(\"{}\", {}),",
            naming::quantity_name(table, column),
            value_expr(column)
        ));
    }
    w.dedent();
    w.write_line("]");
    w.dedent();
    w.write_line("}");
    w.dedent();
    w.write_line("}");
}

fn emit_table_enum(w: &mut IndentWriter, db: &QuantityDb) {
    w.blank_line();
    w.write_line("#[derive(Debug, Clone)]");
    w.write_line("pub enum Table {");
    w.indent();
    for table in &db.tables {
        w.write_line(&format!("{}(tables::{}),", table.name, table.name));
    }
    w.dedent();
    w.write_line("}");

    w.blank_line();
    w.write_line("impl Table {");
    w.indent();
    w.write_line("/// Route a named relation to the matching record decoder.");
    w.write_line(
        "pub fn from_tuple_data(relation_name: &str, tuple: &TupleData) -> Result<Self, RuntimeError> {",
    );
    w.indent();
    w.write_line("match relation_name {");
    w.indent();
    for table in &db.tables {
        w.write_line(&format!(
            "\"{}\" => Ok(Table::{}(tables::{}::from_tuple_data(tuple)?)),",
            table.name, table.name, table.name
        ));
    }
    w.write_line("table => Err(RuntimeError::UnknownTable {");
    w.indent();
    w.write_line("table: table.to_string(),");
    w.dedent();
    w.write_line("}),");
    w.dedent();
    w.write_line("}");
    w.dedent();
    w.write_line("}");
    w.dedent();
    w.write_line("}");

    w.blank_line();
    w.write_line("impl TableValues<Selector> for Table {");
    w.indent();
    for (method, return_type) in [
        ("time", "Time"),
        ("selector", "Selector"),
        ("values", "Vec<(&'static str, Value)>"),
    ] {
        if method != "time" {
            w.blank_line();
        }
        w.write_line(&format!("fn {method}(&self) -> {return_type} {{"));
        w.indent();
        w.write_line("match self {");
        w.indent();
        for table in &db.tables {
            w.write_line(&format!("Table::{}(t) => t.{method}(),", table.name));
        }
        w.dedent();
        w.write_line("}");
        w.dedent();
        w.write_line("}");
    }
    w.dedent();
    w.write_line("}");
}

fn emit_selector_enum(w: &mut IndentWriter, selectors: &[Selector]) {
    w.blank_line();
    w.write_line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]");
    w.write_line("pub enum Selector {");
    w.indent();
    for selector in selectors {
        let payload: Vec<String> = if selector.non_time_fields().is_empty() {
            vec!["()".to_string()]
        } else {
            selector
                .non_time_fields()
                .iter()
                .map(selector_field_type)
                .collect()
        };
        w.write_line(&format!(
            "{}({}),",
            selector.variant_name(),
            payload.join(", ")
        ));
    }
    w.dedent();
    w.write_line("}");
}

fn emit_value_provider(w: &mut IndentWriter, db: &QuantityDb) {
    w.blank_line();
    w.write_line("#[derive(Debug, Default)]");
    w.write_line("pub struct ValueProvider {");
    w.indent();
    for table in &db.tables {
        for column in &table.columns {
            w.write_line(&format!(
                "{}: {},",
                naming::quantity_name(table, column),
                storage_type(table, column)
            ));
        }
    }
    w.dedent();
    w.write_line("}");

    w.blank_line();
    w.write_line("impl ValueProvider {");
    w.indent();
    w.write_line("pub fn new() -> Self {");
    w.indent();
    w.write_line("Self::default()");
    w.dedent();
    w.write_line("}");

    // The single lookup every read goes through. Quantity names are
    // generator-emitted constants; an unknown one is unrecoverable.
    w.blank_line();
    w.write_line(
        "fn get_impl(&self, name: &'static str, selector: &Selector, t: &Time) -> Option<Value> {",
    );
    w.indent();
    w.write_line("match name {");
    w.indent();
    for table in &db.tables {
        for column in &table.columns {
            let quantity = naming::quantity_name(table, column);
            w.write_line(&format!(
                "\"{quantity}\" => self.{quantity}.get(selector)?.get(t).map({}),",
                value_ctor(column.data_type)
            ));
        }
    }
    w.write_line("_ => panic!(\"unknown quantity {name}\"),");
    w.dedent();
    w.write_line("}");
    w.dedent();
    w.write_line("}");

    w.blank_line();
    w.write_line("pub fn set(&mut self, name: &'static str, selector: Selector, t: Time, value: Value) {");
    w.indent();
    w.write_line("match name {");
    w.indent();
    for table in &db.tables {
        for column in &table.columns {
            let quantity = naming::quantity_name(table, column);
            w.write_line(&format!(
                "\"{quantity}\" => self.{quantity}.entry(selector).or_default().set(&t, value{}),",
                value_read(column.data_type)
            ));
        }
    }
    w.write_line("_ => panic!(\"unknown quantity {name}\"),");
    w.dedent();
    w.write_line("}");
    w.dedent();
    w.write_line("}");

    w.blank_line();
    w.write_line("/// Point lookup; absence is unrecoverable for the caller.");
    w.write_line("pub fn get(&self, name: &'static str, selector: &Selector, t: &Time) -> Value {");
    w.indent();
    w.write_line("match self.get_impl(name, selector, t) {");
    w.indent();
    w.write_line("Some(value) => value,");
    w.write_line("None => panic!(\"value not found: {name}({selector:?}, {t:?})\"),");
    w.dedent();
    w.write_line("}");
    w.dedent();
    w.write_line("}");

    w.blank_line();
    w.write_line("/// Point lookup; absence is an ordinary outcome.");
    w.write_line(
        "pub fn get_opt(&self, name: &'static str, selector: &Selector, t: &Time) -> Option<Value> {",
    );
    w.indent();
    w.write_line("self.get_impl(name, selector, t)");
    w.dedent();
    w.write_line("}");
    w.dedent();
    w.write_line("}");
}

fn emit_loader(w: &mut IndentWriter, db: &QuantityDb) {
    w.blank_line();
    w.write_line("/// Populate a fresh provider from the persisted relational rows.");
    w.write_line(
        "pub fn load_value_provider(store: &dyn RowStore) -> Result<ValueProvider, DecodeError> {",
    );
    w.indent();
    w.write_line("let mut vp = ValueProvider::new();");
    for table in &db.tables {
        w.write_line(&format!("for row in store.rows(\"{}\") {{", table.name));
        w.indent();
        w.write_line(&format!(
            "let record = tables::{}::from_row(&row)?;",
            table.name
        ));
        w.write_line("let selector = record.selector();");
        w.write_line("let t = record.time();");
        w.write_line("for (name, value) in record.values() {");
        w.indent();
        w.write_line("vp.set(name, selector, t, value);");
        w.dedent();
        w.write_line("}");
        w.dedent();
        w.write_line("}");
    }
    w.write_line("Ok(vp)");
    w.dedent();
    w.write_line("}");
}

fn emit_accessor_mod(w: &mut IndentWriter, table: &Table) {
    w.blank_line();
    w.write_line(&format!("pub mod {} {{", table.name));
    w.indent();

    let entity_imports: Vec<String> = table
        .selector
        .non_time_fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    if entity_imports.is_empty() {
        w.write_line("use super::{Selector, Time, ValueProvider};");
    } else {
        w.write_line(&format!(
            "use super::{{{}, Selector, Time, ValueProvider}};",
            entity_imports.join(", ")
        ));
    }

    for column in &table.columns {
        let args: Vec<String> = table
            .selector
            .non_time_fields()
            .iter()
            .map(|f| format!("{}: {}", naming::selector_var_name(f), f.name()))
            .collect();
        let arg_list = if args.is_empty() {
            "vp: &ValueProvider, t: Time".to_string()
        } else {
            format!("vp: &ValueProvider, {}, t: Time", args.join(", "))
        };
        let variant_args: Vec<String> = table
            .selector
            .non_time_fields()
            .iter()
            .map(|f| naming::selector_var_name(f))
            .collect();
        let variant_expr = if variant_args.is_empty() {
            format!("Selector::{}(())", table.selector.variant_name())
        } else {
            format!(
                "Selector::{}({})",
                table.selector.variant_name(),
                variant_args.join(", ")
            )
        };

        w.blank_line();
        w.write_line(&format!(
            "pub fn {}({arg_list}) -> {} {{",
            naming::column_field_name(column),
            naming::target_type(column.data_type, Target::Runtime)
        ));
        w.indent();
        w.write_line(&format!(
            "vp.get(\"{}\", &{variant_expr}, &t){}",
            naming::quantity_name(table, column),
            value_read(column.data_type)
        ));
        w.dedent();
        w.write_line("}");
    }

    w.dedent();
    w.write_line("}");
}

fn emit_prelude(w: &mut IndentWriter, db: &QuantityDb) {
    w.blank_line();
    w.write_line("pub mod prelude {");
    w.indent();
    w.write_line("pub use super::tables;");
    w.write_line("pub use super::{load_value_provider, Selector, Table, ValueProvider};");
    if !db.entities.is_empty() {
        let names: Vec<String> = db
            .entities
            .iter()
            .flat_map(|e| [e.name.clone(), naming::entity_table_name(e)])
            .collect();
        w.write_line(&format!("pub use super::{{{}}};", names.join(", ")));
    }
    if !db.tables.is_empty() {
        let names: Vec<&str> = db.tables.iter().map(|t| t.name.as_str()).collect();
        w.write_line(&format!("pub use super::{{{}}};", names.join(", ")));
    }
    w.dedent();
    w.write_line("}");
}

fn selector_field_type(field: &SelField) -> String {
    match field {
        SelField::Time => "Time".to_string(),
        SelField::Entity { name, .. } => name.clone(),
    }
}

/// `Selector::<Variant>(...)` payload built from a record's own fields.
fn selector_payload_expr(selector: &Selector, receiver: &str) -> String {
    let non_time = selector.non_time_fields();
    if non_time.is_empty() {
        return "()".to_string();
    }
    let parts: Vec<String> = non_time
        .iter()
        .map(|f| format!("{receiver}{}", f.name()))
        .collect();
    parts.join(", ")
}

fn series_type(repr: TimeRepr) -> &'static str {
    match repr {
        TimeRepr::Changes => "TimeSeriesChanges",
        TimeRepr::Dense => "TimeSeriesDense",
        TimeRepr::Interval => "TimeSeriesInterval",
    }
}

fn storage_type(table: &Table, column: &Column) -> String {
    format!(
        "HashMap<Selector, {}<{}>>",
        series_type(table.time_repr),
        naming::target_type(column.data_type, Target::Runtime)
    )
}

fn value_ctor(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Int => "Value::Int",
        DataType::Float => "Value::Float",
        DataType::Text => "Value::Text",
    }
}

fn value_read(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Int => ".as_int()",
        DataType::Float => ".as_float()",
        DataType::Text => ".into_text()",
    }
}

fn value_expr(column: &Column) -> String {
    match column.data_type {
        DataType::Text => format!(
            "Value::Text(self.{}.clone())",
            naming::column_field_name(column)
        ),
        _ => format!(
            "{}(self.{})",
            value_ctor(column.data_type),
            naming::column_field_name(column)
        ),
    }
}

fn entity_select_sql(entity: &Entity) -> String {
    let columns: Vec<String> = entity
        .columns
        .iter()
        .map(|c| format!("\"{}\"", c.name))
        .collect();
    format!(
        "SELECT {} FROM \"{}\" ORDER BY \"Id{}Def\"",
        columns.join(", "),
        naming::entity_table_name(entity),
        entity.name
    )
}

fn table_select_sql(table: &Table) -> String {
    let mut columns: Vec<String> = Vec::new();
    for field in &table.selector.fields {
        match field {
            SelField::Time => columns
                .push("EXTRACT(EPOCH FROM \"Time\")::BIGINT AS \"Time\"".to_string()),
            SelField::Entity { .. } => {
                columns.push(format!("\"{}\"", naming::selector_column_name(field)))
            }
        }
    }
    for column in &table.columns {
        columns.push(format!("\"{}\"", column.name));
    }
    format!("SELECT {} FROM \"{}\"", columns.join(", "), table.name)
}
