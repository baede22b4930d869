//! Generator for converting a schema graph back to CREATE TABLE statements.

use crate::model::{Column, Table};
use crate::sql::Dialect;
use crate::sql::types::{auto_increment_keyword, can_have_length, supports_auto_increment};
use crate::validate::split_type_and_length;

/// Render `tables` as a SQL script, one CREATE TABLE per table.
pub fn generate_sql(tables: &[Table], dialect: Dialect) -> String {
    tables
        .iter()
        .map(|table| generate_table(table, dialect))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn generate_table(table: &Table, dialect: Dialect) -> String {
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|column| generate_column(column, dialect))
        .collect();

    // Foreign keys go after all column definitions
    for column in &table.columns {
        if let Some(fk) = &column.foreign_key {
            lines.push(format!(
                "  FOREIGN KEY ({}) REFERENCES {}({})",
                column.name, fk.table, fk.column
            ));
        }
    }

    format!("CREATE TABLE {} (\n{}\n);", table.name, lines.join(",\n"))
}

fn generate_column(column: &Column, dialect: Dialect) -> String {
    let mut def = format!("  {} {}", column.name, column_type(&column.typ, dialect));

    if column.primary_key {
        def.push_str(" PRIMARY KEY");
    }

    if column.auto_increment && supports_auto_increment(dialect) {
        if let Some(keyword) = auto_increment_keyword(dialect) {
            def.push(' ');
            def.push_str(keyword);
        }
    }

    if !column.nullable {
        def.push_str(" NOT NULL");
    }

    if column.unique && !column.primary_key {
        def.push_str(" UNIQUE");
    }

    if let Some(default) = column.default_value.as_deref().filter(|d| !d.is_empty()) {
        def.push_str(" DEFAULT ");
        def.push_str(default);
    }

    def
}

/// Drop a length the dialect does not accept for this base type.
fn column_type(typ: &str, dialect: Dialect) -> String {
    match split_type_and_length(typ) {
        (base, Some(_)) if !can_have_length(&base, dialect) => base,
        _ => typ.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForeignKeyRef, Position};
    use crate::pipeline::parse_sql;

    fn column(name: &str, typ: &str) -> Column {
        Column {
            typ: typ.to_string(),
            ..Column::bare(name)
        }
    }

    #[test]
    fn test_generate_table() {
        let table = Table {
            name: "books".to_string(),
            columns: vec![
                Column {
                    primary_key: true,
                    auto_increment: true,
                    nullable: false,
                    ..column("id", "INT")
                },
                Column {
                    unique: true,
                    default_value: Some("'untitled'".to_string()),
                    ..column("title", "VARCHAR(200)")
                },
                Column {
                    foreign_key: Some(ForeignKeyRef {
                        table: "authors".to_string(),
                        column: "id".to_string(),
                    }),
                    ..column("author_id", "INT")
                },
            ],
            position: Position::default(),
        };

        let sql = generate_sql(&[table], Dialect::MySQL);
        let expected = "\
CREATE TABLE books (
  id INT PRIMARY KEY AUTO_INCREMENT NOT NULL,
  title VARCHAR(200) UNIQUE DEFAULT 'untitled',
  author_id INT,
  FOREIGN KEY (author_id) REFERENCES authors(id)
);";
        assert_eq!(sql, expected);
    }

    #[test]
    fn test_dialect_specific_output() {
        let table = Table {
            name: "t".to_string(),
            columns: vec![Column {
                primary_key: true,
                auto_increment: true,
                ..column("id", "INT(11)")
            }],
            position: Position::default(),
        };

        let postgres = generate_sql(std::slice::from_ref(&table), Dialect::PostgreSQL);
        assert!(postgres.contains("  id INT PRIMARY KEY\n"));

        let sqlite = generate_sql(std::slice::from_ref(&table), Dialect::SQLite);
        assert!(sqlite.contains("  id INT PRIMARY KEY AUTOINCREMENT\n"));
    }

    #[test]
    fn test_generated_sql_parses_back() {
        let sql = Dialect::MySQL.example_sql();
        let schema = parse_sql(sql, Dialect::MySQL, None, false).schema.unwrap();

        let regenerated = generate_sql(&schema.tables, Dialect::MySQL);
        let reparsed = parse_sql(&regenerated, Dialect::MySQL, None, false);

        assert!(reparsed.success);
        let reparsed = reparsed.schema.unwrap();
        assert_eq!(reparsed.tables.len(), schema.tables.len());
        assert_eq!(reparsed.relationships, schema.relationships);
    }
}
