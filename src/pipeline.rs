//! SQL script to schema graph.

use thiserror::Error;
use tracing::{debug, warn};

use crate::extract::extract_table;
use crate::layout::LayoutEngine;
use crate::model::{ErrorReport, ParseResult, Schema, Table};
use crate::relations::infer_relationships;
use crate::split::{is_create_table, split_statements};
use crate::sql::{Dialect, SqlParseError, parse_create_table};

/// A statement that contributed nothing (or a duplicate) to the schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatementError {
    #[error("{0}")]
    Parse(#[from] SqlParseError),
    #[error("Unsupported statement type: {0}")]
    Unsupported(String),
    #[error("Table \"{0}\" already exists.")]
    DuplicateTable(String),
}

/// State owned by one pipeline run: the tables extracted so far, the prior
/// schema used for position carry-over, and the layout engine.
pub struct BatchContext<'a> {
    pub(crate) tables: Vec<Table>,
    pub(crate) previous: Option<&'a Schema>,
    pub(crate) layout: &'a LayoutEngine,
}

impl<'a> BatchContext<'a> {
    pub fn new(previous: Option<&'a Schema>, layout: &'a LayoutEngine) -> Self {
        Self {
            tables: Vec::new(),
            previous,
            layout,
        }
    }
}

/// Options for [`parse_sql_with`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions<'a> {
    pub dialect: Dialect,
    /// Schema from the previous run; same-named tables keep their position.
    pub previous: Option<&'a Schema>,
    /// Recompute every position instead of reusing `previous`.
    pub reset_positions: bool,
    pub layout: LayoutEngine,
}

/// Parse a SQL script with the default layout.
pub fn parse_sql(
    sql: &str,
    dialect: Dialect,
    previous: Option<&Schema>,
    reset_positions: bool,
) -> ParseResult {
    parse_sql_with(
        sql,
        &ParseOptions {
            dialect,
            previous,
            reset_positions,
            layout: LayoutEngine::default(),
        },
    )
}

/// Parse a SQL script into a schema graph.
///
/// Failing statements are collected rather than aborting the run; the result
/// then carries the best-effort schema together with every error message and
/// the 1-based index of the first failing statement.
pub fn parse_sql_with(sql: &str, options: &ParseOptions<'_>) -> ParseResult {
    if sql.trim().is_empty() {
        return ParseResult {
            success: false,
            schema: Some(Schema::default()),
            error: Some(ErrorReport {
                message: "SQL input is empty".to_string(),
                statement_index: None,
            }),
        };
    }

    let mut ctx = BatchContext::new(options.previous, &options.layout);
    let mut errors: Vec<(usize, StatementError)> = Vec::new();

    for (i, statement) in split_statements(sql).iter().enumerate() {
        let statement_index = i + 1;
        if let Err(err) = process_statement(statement, options, &mut ctx) {
            warn!(statement = statement_index, error = %err, "statement rejected");
            errors.push((statement_index, err));
        }
    }

    let relationships = infer_relationships(&ctx.tables);
    debug!(
        tables = ctx.tables.len(),
        relationships = relationships.len(),
        errors = errors.len(),
        "parse finished"
    );

    let schema = Schema {
        tables: ctx.tables,
        relationships,
    };

    let error = errors.first().map(|&(first_index, _)| ErrorReport {
        message: errors
            .iter()
            .map(|(_, e)| e.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        statement_index: Some(first_index),
    });

    ParseResult {
        success: error.is_none(),
        schema: Some(schema),
        error,
    }
}

/// Classify, parse and extract one statement into `ctx`.
///
/// A duplicate table is reported but still kept.
fn process_statement(
    statement: &str,
    options: &ParseOptions<'_>,
    ctx: &mut BatchContext<'_>,
) -> Result<(), StatementError> {
    if !is_create_table(statement) {
        return Err(StatementError::Unsupported(statement.to_string()));
    }

    let tree = parse_create_table(statement, options.dialect)?;

    let index = ctx.tables.len();
    let Some(table) = extract_table(&tree, index, options.reset_positions, ctx) else {
        return Ok(());
    };

    let duplicate = ctx.tables.iter().any(|t| t.name == table.name);
    let name = table.name.clone();
    ctx.tables.push(table);

    if duplicate {
        Err(StatementError::DuplicateTable(name))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RelationshipKind;

    const LIBRARY: &str = r#"
        CREATE TABLE authors (id INT PRIMARY KEY, name VARCHAR(100) NOT NULL);
        CREATE TABLE books (
            id INT PRIMARY KEY,
            title VARCHAR(200),
            author_id INT,
            FOREIGN KEY (author_id) REFERENCES authors(id)
        );
    "#;

    #[test]
    fn test_parse_success() {
        let result = parse_sql(LIBRARY, Dialect::MySQL, None, false);
        assert!(result.success);
        assert!(result.error.is_none());

        let schema = result.schema.unwrap();
        assert_eq!(schema.tables.len(), 2);
        assert_eq!(schema.relationships.len(), 1);
        assert_eq!(schema.relationships[0].kind, RelationshipKind::OneToMany);
    }

    #[test]
    fn test_errors_do_not_stop_the_batch() {
        let sql = "SELECT 1; CREATE TABLE broken (id INT; CREATE TABLE ok (id INT)";
        let result = parse_sql(sql, Dialect::PostgreSQL, None, false);

        assert!(!result.success);
        let error = result.error.unwrap();
        assert_eq!(error.statement_index, Some(1));
        let lines: Vec<&str> = error.message.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Unsupported statement type: SELECT 1");
        assert_eq!(lines[1], "Unexpected end of input");

        let schema = result.schema.unwrap();
        assert_eq!(schema.tables.len(), 1);
        assert_eq!(schema.tables[0].name, "ok");
    }

    #[test]
    fn test_duplicate_table_is_kept() {
        let sql = "CREATE TABLE t (id INT); CREATE TABLE t (id INT)";
        let result = parse_sql(sql, Dialect::SQLite, None, false);

        assert!(!result.success);
        let error = result.error.unwrap();
        assert_eq!(error.message, "Table \"t\" already exists.");
        assert_eq!(error.statement_index, Some(2));
        assert_eq!(result.schema.unwrap().tables.len(), 2);
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let sql = "CREATE TABLE t (id INT); CREATE TABLE T (id INT)";
        let result = parse_sql(sql, Dialect::SQLite, None, false);
        assert!(result.success);
    }

    #[test]
    fn test_empty_input() {
        let result = parse_sql("  \n ", Dialect::MySQL, None, false);
        assert!(!result.success);
        assert_eq!(result.error.unwrap().message, "SQL input is empty");
        assert_eq!(result.schema, Some(Schema::default()));
    }

    #[test]
    fn test_positions_carry_over() {
        let first = parse_sql(LIBRARY, Dialect::MySQL, None, false).schema.unwrap();

        let mut moved = first.clone();
        moved.tables[1].position.x = 5000.0;

        let again = parse_sql(LIBRARY, Dialect::MySQL, Some(&moved), false)
            .schema
            .unwrap();
        assert_eq!(again.tables[1].position, moved.tables[1].position);

        let reset = parse_sql(LIBRARY, Dialect::MySQL, Some(&moved), true)
            .schema
            .unwrap();
        assert_eq!(reset.tables[1].position, first.tables[1].position);
    }
}
