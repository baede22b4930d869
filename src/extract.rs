//! Turns one CREATE TABLE syntax tree into a positioned [`Table`].

use tracing::{debug, warn};

use crate::model::{Column, ForeignKeyRef, Position, Table, UNKNOWN_TYPE, find_table};
use crate::pipeline::BatchContext;
use crate::sql::tree::{ColumnDef, CreateTable, DataType, Definition};

/// Column a foreign key references when the REFERENCES clause names none.
const DEFAULT_REFERENCED_COLUMN: &str = "id";

/// A foreign key declared by the statement, before it is checked against the
/// tables extracted earlier in the batch.
#[derive(Debug, Clone)]
struct PendingForeignKey {
    column: String,
    table: String,
    referenced_column: String,
}

/// Extract the table described by `tree`, created at `index` in the batch.
///
/// Returns `None` when the tree carries no table name.
pub fn extract_table(
    tree: &CreateTable,
    index: usize,
    reset_positions: bool,
    ctx: &BatchContext<'_>,
) -> Option<Table> {
    if tree.name.trim().is_empty() {
        return None;
    }

    let mut columns: Vec<Column> = Vec::new();
    let mut foreign_keys: Vec<PendingForeignKey> = Vec::new();

    for definition in &tree.definitions {
        match definition {
            Definition::Column(def) => {
                if let Some(reference) = &def.references {
                    foreign_keys.push(PendingForeignKey {
                        column: def.name.clone(),
                        table: reference.table.clone(),
                        referenced_column: first_or_default(&reference.columns),
                    });
                }
                columns.push(column_from_def(def));
            }
            Definition::ForeignKey(fk) => {
                // Single-column model: composite keys keep their first column
                let Some(local) = fk.columns.first() else {
                    continue;
                };
                foreign_keys.push(PendingForeignKey {
                    column: local.clone(),
                    table: fk.reference.table.clone(),
                    referenced_column: first_or_default(&fk.reference.columns),
                });
                if !columns.iter().any(|c| &c.name == local) {
                    columns.push(Column::bare(local.clone()));
                }
            }
            Definition::Other(_) => {}
        }
    }

    for fk in &foreign_keys {
        if !references_known_column(&ctx.tables, fk) {
            warn!(
                table = %tree.name,
                column = %fk.column,
                references = %format!("{}.{}", fk.table, fk.referenced_column),
                "dropping foreign key to unknown table or column"
            );
            continue;
        }
        if let Some(column) = columns.iter_mut().find(|c| c.name == fk.column) {
            column.foreign_key = Some(ForeignKeyRef {
                table: fk.table.clone(),
                column: fk.referenced_column.clone(),
            });
        }
    }

    let fk_targets: Vec<&str> = foreign_keys.iter().map(|fk| fk.table.as_str()).collect();
    let position = assign_position(&tree.name, &fk_targets, index, reset_positions, ctx);

    debug!(table = %tree.name, columns = columns.len(), "extracted table");

    Some(Table {
        name: tree.name.clone(),
        columns,
        position,
    })
}

fn assign_position(
    name: &str,
    fk_targets: &[&str],
    index: usize,
    reset_positions: bool,
    ctx: &BatchContext<'_>,
) -> Position {
    if !reset_positions {
        if let Some(existing) = ctx.previous.and_then(|schema| schema.find_table(name)) {
            return existing.position;
        }
    }
    ctx.layout.place(name, fk_targets, index, &ctx.tables)
}

fn references_known_column(tables: &[Table], fk: &PendingForeignKey) -> bool {
    find_table(tables, &fk.table)
        .is_some_and(|target| target.has_column_ignore_case(&fk.referenced_column))
}

fn first_or_default(columns: &[String]) -> String {
    columns
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_REFERENCED_COLUMN.to_string())
}

fn column_from_def(def: &ColumnDef) -> Column {
    Column {
        name: def.name.clone(),
        typ: normalize_type(def.data_type.as_ref()),
        nullable: !def.not_null,
        primary_key: def.primary_key,
        auto_increment: def.auto_increment,
        unique: def.unique,
        default_value: def.default.clone(),
        foreign_key: None,
    }
}

/// `VARCHAR(100)`, `NUMERIC(10,2)`, or `UNKNOWN` when no type was declared.
pub fn normalize_type(data_type: Option<&DataType>) -> String {
    match data_type {
        None => UNKNOWN_TYPE.to_string(),
        Some(dt) if dt.params.is_empty() => dt.name.to_uppercase(),
        Some(dt) => format!("{}({})", dt.name, dt.params.join(",")).to_uppercase(),
    }
}
