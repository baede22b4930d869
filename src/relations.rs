//! Relationship inference over an extracted table set.

use tracing::debug;

use crate::model::{Column, Relationship, RelationshipKind, Table, find_table};

const JUNCTION_NAME_HINTS: [&str; 3] = ["junction", "bridge", "link"];

/// Whether `table` exists only to join two others: at least two foreign keys,
/// at most two plain columns, and a join-like name.
pub fn is_junction_table(table: &Table) -> bool {
    let fk_count = table.foreign_key_columns().count();
    let plain_count = table
        .columns
        .iter()
        .filter(|c| c.foreign_key.is_none() && !c.primary_key)
        .count();

    let lower = table.name.to_lowercase();
    let join_like_name =
        table.name.contains('_') || JUNCTION_NAME_HINTS.iter().any(|hint| lower.contains(hint));

    fk_count >= 2 && plain_count <= 2 && join_like_name
}

/// Derive relationships from the foreign keys in `tables`.
///
/// Junction tables collapse into one many-to-many relationship between the
/// targets of their first two foreign keys; any further keys on a junction
/// table are not represented. IDs are sequential: every junction relationship
/// first, in table order, then the foreign keys of the remaining tables in
/// table and column order.
pub fn infer_relationships(tables: &[Table]) -> Vec<Relationship> {
    let (junctions, others): (Vec<&Table>, Vec<&Table>) =
        tables.iter().partition(|t| is_junction_table(t));

    let mut relationships: Vec<Relationship> = junctions
        .into_iter()
        .filter_map(many_to_many)
        .collect();

    for table in others {
        for column in &table.columns {
            let Some(fk) = &column.foreign_key else {
                continue;
            };
            let Some(target) = find_table(tables, &fk.table) else {
                continue;
            };

            relationships.push(Relationship {
                id: String::new(),
                from_table: table.name.clone(),
                from_column: column.name.clone(),
                to_table: fk.table.clone(),
                to_column: fk.column.clone(),
                kind: relationship_kind(table, column, target),
                junction_table: None,
            });
        }
    }

    for (i, rel) in relationships.iter_mut().enumerate() {
        rel.id = format!("rel_{}", i);
    }
    relationships
}

fn many_to_many(junction: &Table) -> Option<Relationship> {
    let mut fks = junction.foreign_key_columns();
    let left = fks.next()?.foreign_key.as_ref()?;
    let right = fks.next()?.foreign_key.as_ref()?;

    if left.table == right.table {
        debug!(junction = %junction.name, "junction references one table twice");
        return None;
    }

    Some(Relationship {
        id: String::new(),
        from_table: left.table.clone(),
        from_column: left.column.clone(),
        to_table: right.table.clone(),
        to_column: right.column.clone(),
        kind: RelationshipKind::ManyToMany,
        junction_table: Some(junction.name.clone()),
    })
}

/// One-to-one when either side of the link is unique.
fn relationship_kind(from: &Table, column: &Column, target: &Table) -> RelationshipKind {
    if column.is_unique_or_pk() {
        return RelationshipKind::OneToOne;
    }

    let unique_back_reference = target.columns.iter().any(|c| {
        c.is_unique_or_pk()
            && c.foreign_key
                .as_ref()
                .is_some_and(|fk| fk.table.eq_ignore_ascii_case(&from.name))
    });

    if unique_back_reference {
        RelationshipKind::OneToOne
    } else {
        RelationshipKind::OneToMany
    }
}
