//! Checks used when editing a schema graph by hand.

use serde::Serialize;

use crate::model::Table;
use crate::sql::Dialect;
use crate::sql::types::requires_length;

/// A primary key another column could reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibleKey {
    pub table: String,
    pub column: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub length: Option<u32>,
}

/// Whether `name` can be used for a new table alongside `tables`.
///
/// Names are identifiers (`[A-Za-z_][A-Za-z0-9_]*`) and must not clash with an
/// existing table, ignoring case.
pub fn is_valid_table_name(name: &str, tables: &[Table]) -> bool {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return false;
    }
    if tables.iter().any(|t| t.name.eq_ignore_ascii_case(trimmed)) {
        return false;
    }

    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `table_name` has a primary key column other than `exclude_column`.
pub fn table_has_primary_key(table_name: &str, tables: &[Table], exclude_column: &str) -> bool {
    tables
        .iter()
        .find(|t| t.name == table_name)
        .is_some_and(|t| {
            t.columns
                .iter()
                .any(|c| c.primary_key && c.name != exclude_column)
        })
}

/// Split `VARCHAR(100)` into `("VARCHAR", Some(100))`.
///
/// Only the first parameter counts as the length, so `NUMERIC(10,2)` yields
/// `("NUMERIC", Some(10))`. Anything else comes back uppercased with no length.
pub fn split_type_and_length(full_type: &str) -> (String, Option<u32>) {
    let whole = || (full_type.to_uppercase(), None);

    let Some(inner) = full_type.strip_suffix(')') else {
        return whole();
    };
    let Some((base, params)) = inner.split_once('(') else {
        return whole();
    };

    let base_ok = !base.trim().is_empty()
        && base
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace());
    let params_ok = !params.is_empty()
        && params
            .split(',')
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if !base_ok || !params_ok {
        return whole();
    }

    let length = params.split(',').next().and_then(|p| p.parse().ok());
    (base.trim().to_uppercase(), length)
}

/// Primary keys outside `exclude_table` whose type matches `current_type`.
///
/// Lengths must agree when both sides have one; when only one side has a
/// length, the pair is rejected if either type requires one in `dialect`.
pub fn compatible_primary_keys(
    tables: &[Table],
    exclude_table: &str,
    current_type: &str,
    current_length: Option<u32>,
    dialect: Dialect,
) -> Vec<CompatibleKey> {
    if current_type.is_empty() {
        return Vec::new();
    }

    let mut keys = Vec::new();
    for table in tables.iter().filter(|t| t.name != exclude_table) {
        for column in table.columns.iter().filter(|c| c.primary_key) {
            let (base, length) = split_type_and_length(&column.typ);
            if !base.eq_ignore_ascii_case(current_type) {
                continue;
            }

            let length_ok = match (length, current_length) {
                (Some(a), Some(b)) => a == b,
                (None, None) => true,
                _ => {
                    !requires_length(&base, dialect) && !requires_length(current_type, dialect)
                }
            };

            if length_ok {
                keys.push(CompatibleKey {
                    table: table.name.clone(),
                    column: column.name.clone(),
                    typ: base,
                    length,
                });
            }
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, Position};

    fn table(name: &str, columns: Vec<Column>) -> Table {
        Table {
            name: name.to_string(),
            columns,
            position: Position::default(),
        }
    }

    fn pk(name: &str, typ: &str) -> Column {
        Column {
            typ: typ.to_string(),
            primary_key: true,
            nullable: false,
            ..Column::bare(name)
        }
    }

    #[test]
    fn test_table_name_rules() {
        let tables = vec![table("Users", vec![])];

        assert!(is_valid_table_name("orders", &tables));
        assert!(is_valid_table_name("_tmp1", &tables));
        assert!(!is_valid_table_name("users", &tables));
        assert!(!is_valid_table_name("   ", &tables));
        assert!(!is_valid_table_name("1st", &tables));
        assert!(!is_valid_table_name("order-items", &tables));
    }

    #[test]
    fn test_primary_key_presence() {
        let tables = vec![
            table("users", vec![pk("id", "INT"), Column::bare("name")]),
            table("logs", vec![Column::bare("line")]),
        ];

        assert!(table_has_primary_key("users", &tables, ""));
        assert!(!table_has_primary_key("users", &tables, "id"));
        assert!(!table_has_primary_key("logs", &tables, ""));
        assert!(!table_has_primary_key("missing", &tables, ""));
    }

    #[test]
    fn test_split_type_and_length() {
        assert_eq!(
            split_type_and_length("VARCHAR(100)"),
            ("VARCHAR".to_string(), Some(100))
        );
        assert_eq!(
            split_type_and_length("numeric(10,2)"),
            ("NUMERIC".to_string(), Some(10))
        );
        assert_eq!(
            split_type_and_length("character varying(20)"),
            ("CHARACTER VARYING".to_string(), Some(20))
        );
        assert_eq!(split_type_and_length("text"), ("TEXT".to_string(), None));
        assert_eq!(
            split_type_and_length("ENUM('a')"),
            ("ENUM('A')".to_string(), None)
        );
    }

    #[test]
    fn test_compatible_primary_keys() {
        let tables = vec![
            table("users", vec![pk("id", "INT")]),
            table("codes", vec![pk("code", "CHAR(3)")]),
            table("slugs", vec![pk("slug", "VARCHAR(40)")]),
            table("orders", vec![pk("id", "INT")]),
        ];

        let ints = compatible_primary_keys(&tables, "orders", "int", None, Dialect::MySQL);
        assert_eq!(ints.len(), 1);
        assert_eq!(ints[0].table, "users");
        assert_eq!(ints[0].typ, "INT");

        let chars = compatible_primary_keys(&tables, "orders", "CHAR", Some(3), Dialect::MySQL);
        assert_eq!(chars.len(), 1);
        assert_eq!(chars[0].length, Some(3));

        // CHAR needs a length in MySQL, so a bare CHAR does not match CHAR(3)
        assert!(compatible_primary_keys(&tables, "orders", "CHAR", None, Dialect::MySQL).is_empty());

        // SQLite has no required lengths
        let sqlite = compatible_primary_keys(&tables, "orders", "VARCHAR", None, Dialect::SQLite);
        assert_eq!(sqlite.len(), 1);

        assert!(compatible_primary_keys(&tables, "orders", "", None, Dialect::MySQL).is_empty());
    }
}
