//! SQL parser for CREATE TABLE statements.

use super::dialect::Dialect;
use super::lexer::{Token, tokenize};
use super::tree::{
    ColumnDef, CreateTable, DataType, Definition, ForeignKeyConstraint, OtherConstraint, Reference,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SqlParseError {
    #[error("Unexpected token: {0}")]
    UnexpectedToken(Token),
    #[error("Expected {expected}, found {found}")]
    Expected { expected: String, found: Token },
    #[error("Unexpected end of input")]
    UnexpectedEof,
}

/// Parse one CREATE TABLE statement into a syntax tree.
pub fn parse_create_table(input: &str, dialect: Dialect) -> Result<CreateTable, SqlParseError> {
    let tokens = tokenize(input, dialect);
    Parser::new(tokens, dialect).parse()
}

/// Words that end a column's type and start its modifiers.
const MODIFIER_WORDS: [&str; 4] = ["AUTO_INCREMENT", "AUTOINCREMENT", "AUTO", "ON"];

/// Index definitions MySQL spells with a leading qualifier.
const INDEX_QUALIFIERS: [&str; 2] = ["FULLTEXT", "SPATIAL"];

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    dialect: Dialect,
}

impl Parser {
    fn new(tokens: Vec<Token>, dialect: Dialect) -> Self {
        Self {
            tokens,
            pos: 0,
            dialect,
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn next_token(&self) -> &Token {
        self.tokens.get(self.pos + 1).unwrap_or(&Token::Eof)
    }

    /// Identifier text at the cursor, bare or double-quoted.
    fn name(&self) -> Option<&str> {
        match self.current() {
            Token::Ident(name) | Token::Quoted(name) => Some(name),
            _ => None,
        }
    }

    fn eat_word(&mut self, word: &str) -> bool {
        let found = self.current().is_word(word);
        if found {
            self.advance();
        }
        found
    }

    fn expect_word(&mut self, word: &str) -> Result<(), SqlParseError> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(self.expected(word))
        }
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<(), SqlParseError> {
        if self.current() == &token {
            self.advance();
            Ok(())
        } else {
            Err(self.expected(expected))
        }
    }

    fn expected(&self, expected: &str) -> SqlParseError {
        match self.current() {
            Token::Eof => SqlParseError::UnexpectedEof,
            found => SqlParseError::Expected {
                expected: expected.to_string(),
                found: found.clone(),
            },
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<String, SqlParseError> {
        match self.name().map(str::to_string) {
            Some(name) => {
                self.advance();
                Ok(name)
            }
            None => Err(self.expected(expected)),
        }
    }

    fn parse(&mut self) -> Result<CreateTable, SqlParseError> {
        self.expect(Token::Create, "CREATE")?;

        let temporary = self.eat_word("TEMPORARY") || self.eat_word("TEMP");

        self.expect(Token::Table, "TABLE")?;

        let if_not_exists = self.current().is_word("IF") && self.next_token() == &Token::Not;
        if if_not_exists {
            self.advance();
            self.advance();
            self.expect_word("EXISTS")?;
        }

        let name = self.parse_qualified_name("table name")?;
        let definitions = self.parse_table_body()?;

        // Table options (ENGINE=, WITHOUT ROWID, ...) carry nothing we keep
        self.skip_statement();

        Ok(CreateTable {
            name,
            temporary,
            if_not_exists,
            definitions,
        })
    }

    /// `name` or `schema.name`; only the last part is kept.
    fn parse_qualified_name(&mut self, expected: &str) -> Result<String, SqlParseError> {
        let mut name = self.expect_ident(expected)?;
        while self.current() == &Token::Dot {
            self.advance();
            name = self.expect_ident(expected)?;
        }
        Ok(name)
    }

    fn parse_table_body(&mut self) -> Result<Vec<Definition>, SqlParseError> {
        self.expect(Token::LParen, "(")?;

        let mut definitions = Vec::new();

        loop {
            let definition = match self.current() {
                Token::Constraint => {
                    self.advance();
                    let name = self.name().map(str::to_string);
                    if name.is_some() {
                        self.advance();
                    }
                    self.parse_constraint(name)?
                }
                Token::Primary | Token::Foreign | Token::Unique | Token::Check | Token::Index
                | Token::Key => self.parse_constraint(None)?,
                Token::Ident(word)
                    if INDEX_QUALIFIERS.iter().any(|q| word.eq_ignore_ascii_case(q))
                        && matches!(self.next_token(), Token::Key | Token::Index) =>
                {
                    self.advance();
                    self.parse_constraint(None)?
                }
                Token::Ident(_) | Token::Quoted(_) => Definition::Column(self.parse_column()?),
                Token::Eof => return Err(SqlParseError::UnexpectedEof),
                other => return Err(SqlParseError::UnexpectedToken(other.clone())),
            };
            definitions.push(definition);

            match self.current() {
                Token::Comma => self.advance(),
                Token::RParen => {
                    self.advance();
                    break;
                }
                _ => return Err(self.expected("',' or ')'")),
            }
        }

        Ok(definitions)
    }

    fn parse_constraint(&mut self, name: Option<String>) -> Result<Definition, SqlParseError> {
        match self.current() {
            Token::Primary => {
                // PRIMARY KEY (col1, col2, ...)
                self.advance();
                self.expect(Token::Key, "KEY")?;
                let cols = self.parse_column_list()?;
                Ok(Definition::Other(OtherConstraint::PrimaryKey(cols)))
            }
            Token::Foreign => {
                // FOREIGN KEY (col) REFERENCES table(col)
                self.advance();
                self.expect(Token::Key, "KEY")?;
                let columns = self.parse_column_list()?;
                self.expect(Token::References, "REFERENCES")?;
                let reference = self.parse_reference()?;
                self.skip_on_actions();
                Ok(Definition::ForeignKey(ForeignKeyConstraint {
                    name,
                    columns,
                    reference,
                }))
            }
            Token::Unique => {
                // UNIQUE [KEY|INDEX] [name] (col1, col2, ...)
                self.advance();
                if matches!(self.current(), Token::Key | Token::Index) {
                    self.advance();
                }
                if self.name().is_some() {
                    self.advance();
                }
                let cols = self.parse_column_list()?;
                Ok(Definition::Other(OtherConstraint::Unique(cols)))
            }
            Token::Index | Token::Key => {
                // INDEX [name] (col1, ...)
                self.advance();
                if self.name().is_some() {
                    self.advance();
                }
                let cols = self.parse_column_list()?;
                Ok(Definition::Other(OtherConstraint::Index(cols)))
            }
            Token::Check => {
                self.advance();
                if self.current() != &Token::LParen {
                    return Err(self.expected("("));
                }
                self.skip_parenthesized();
                Ok(Definition::Other(OtherConstraint::Check))
            }
            _ => Err(self.expected("constraint")),
        }
    }

    fn parse_column(&mut self) -> Result<ColumnDef, SqlParseError> {
        let name = self.expect_ident("column name")?;
        let mut column = ColumnDef::new(name);
        column.data_type = self.parse_data_type()?;

        loop {
            match self.current() {
                Token::Primary => {
                    self.advance();
                    self.expect(Token::Key, "KEY")?;
                    column.primary_key = true;
                }
                Token::Not => {
                    self.advance();
                    self.expect(Token::Null, "NULL")?;
                    column.not_null = true;
                }
                Token::Null => {
                    // Explicitly nullable
                    self.advance();
                }
                Token::Unique => {
                    self.advance();
                    if self.current() == &Token::Key {
                        self.advance();
                    }
                    column.unique = true;
                }
                Token::Default => {
                    self.advance();
                    column.default = Some(self.parse_default_value()?);
                }
                Token::References => {
                    self.advance();
                    column.references = Some(self.parse_reference()?);
                    self.skip_on_actions();
                }
                Token::Ident(w)
                    if w.eq_ignore_ascii_case("AUTO_INCREMENT")
                        || w.eq_ignore_ascii_case("AUTOINCREMENT") =>
                {
                    self.advance();
                    column.auto_increment = true;
                }
                Token::Ident(w) if w.eq_ignore_ascii_case("AUTO") => {
                    self.advance();
                    self.expect_word("INCREMENT")?;
                    column.auto_increment = true;
                }
                Token::Check => {
                    self.advance();
                    self.skip_parenthesized();
                }
                Token::Constraint => {
                    // Named inline constraint; the name is irrelevant
                    self.advance();
                    if self.name().is_some() {
                        self.advance();
                    }
                }
                Token::Ident(w) if w.eq_ignore_ascii_case("ON") => {
                    // MySQL `ON UPDATE CURRENT_TIMESTAMP`
                    self.advance();
                    let _ = self.eat_word("UPDATE") || self.eat_word("DELETE");
                }
                Token::Comma | Token::RParen | Token::Eof => break,
                Token::LParen => self.skip_parenthesized(),
                _ => {
                    // UNSIGNED, COLLATE x, GENERATED ALWAYS AS ...
                    self.advance();
                }
            }
        }

        Ok(column)
    }

    fn parse_data_type(&mut self) -> Result<Option<DataType>, SqlParseError> {
        let mut words = Vec::new();
        while let Token::Ident(word) = self.current() {
            if MODIFIER_WORDS.iter().any(|m| word.eq_ignore_ascii_case(m)) {
                break;
            }
            words.push(word.clone());
            self.advance();
        }

        if words.is_empty() {
            return Ok(None);
        }

        let mut params = Vec::new();
        if self.current() == &Token::LParen {
            self.advance();
            loop {
                match self.current() {
                    Token::Num(n) | Token::Ident(n) => {
                        params.push(n.clone());
                        self.advance();
                    }
                    Token::Str(s) => {
                        params.push(quote_literal(s));
                        self.advance();
                    }
                    Token::Comma => self.advance(),
                    Token::RParen => {
                        self.advance();
                        break;
                    }
                    Token::Eof => return Err(SqlParseError::UnexpectedEof),
                    other => return Err(SqlParseError::UnexpectedToken(other.clone())),
                }
            }
        }

        Ok(Some(DataType {
            name: words.join(" "),
            params,
        }))
    }

    fn parse_default_value(&mut self) -> Result<String, SqlParseError> {
        match self.current() {
            Token::Str(s) => {
                let val = quote_literal(s);
                self.advance();
                Ok(val)
            }
            Token::Num(n) => {
                let val = n.clone();
                self.advance();
                Ok(val)
            }
            Token::Null => {
                self.advance();
                Ok("NULL".to_string())
            }
            // MySQL reads `"abc"` as a string; elsewhere it names a column
            Token::Quoted(s) => {
                let val = if self.dialect.is_mysql_family() {
                    quote_literal(s)
                } else {
                    s.clone()
                };
                self.advance();
                Ok(val)
            }
            Token::Ident(s) => {
                let mut val = s.clone();
                self.advance();
                // Function calls like NOW()
                if self.current() == &Token::LParen {
                    self.advance();
                    let inner = self.collect_until_paren()?;
                    val.push('(');
                    val.push_str(&inner);
                    val.push(')');
                }
                Ok(val)
            }
            Token::LParen => {
                self.advance();
                let inner = self.collect_until_paren()?;
                Ok(format!("({})", inner))
            }
            _ => Err(self.expected("default value")),
        }
    }

    fn collect_until_paren(&mut self) -> Result<String, SqlParseError> {
        let mut parts = Vec::new();
        let mut depth = 1;

        loop {
            match self.current() {
                Token::LParen => {
                    depth += 1;
                    parts.push("(".to_string());
                }
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        break;
                    }
                    parts.push(")".to_string());
                }
                Token::Ident(s) | Token::Num(s) => parts.push(s.clone()),
                Token::Str(s) => parts.push(quote_literal(s)),
                Token::Quoted(s) if self.dialect.is_mysql_family() => parts.push(quote_literal(s)),
                Token::Quoted(s) => parts.push(s.clone()),
                Token::Comma => parts.push(",".to_string()),
                Token::Null => parts.push("NULL".to_string()),
                Token::Eof => return Err(SqlParseError::UnexpectedEof),
                _ => {}
            }
            self.advance();
        }

        Ok(parts.join(" "))
    }

    fn parse_reference(&mut self) -> Result<Reference, SqlParseError> {
        let table = match self.current() {
            Token::Ident(_) | Token::Quoted(_) => self.parse_qualified_name("referenced table")?,
            other => return Err(SqlParseError::UnexpectedToken(other.clone())),
        };

        let columns = if self.current() == &Token::LParen {
            self.parse_column_list()?
        } else {
            Vec::new()
        };

        Ok(Reference { table, columns })
    }

    fn parse_column_list(&mut self) -> Result<Vec<String>, SqlParseError> {
        self.expect(Token::LParen, "(")?;

        let mut cols = Vec::new();
        loop {
            match self.current() {
                Token::Ident(name) | Token::Quoted(name) => {
                    cols.push(name.clone());
                    self.advance();
                    // Index prefix length or sort order: `name(10) DESC`
                    if self.current() == &Token::LParen {
                        self.skip_parenthesized();
                    }
                    while let Token::Ident(_) = self.current() {
                        self.advance();
                    }
                }
                Token::Comma => self.advance(),
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Eof => return Err(SqlParseError::UnexpectedEof),
                other => return Err(SqlParseError::UnexpectedToken(other.clone())),
            }
        }

        if cols.is_empty() {
            return Err(self.expected("column name"));
        }
        Ok(cols)
    }

    /// `ON DELETE|UPDATE CASCADE | RESTRICT | SET NULL | SET DEFAULT | NO ACTION`
    fn skip_on_actions(&mut self) {
        while self.eat_word("ON") {
            let _ = self.eat_word("DELETE") || self.eat_word("UPDATE");

            if self.eat_word("SET") {
                if matches!(self.current(), Token::Null | Token::Default) {
                    self.advance();
                }
            } else if self.eat_word("NO") {
                self.eat_word("ACTION");
            } else {
                let _ = self.eat_word("CASCADE") || self.eat_word("RESTRICT");
            }
        }
    }

    fn skip_parenthesized(&mut self) {
        if self.current() != &Token::LParen {
            self.advance();
            return;
        }
        self.advance();
        let mut depth = 1;
        while depth > 0 {
            match self.current() {
                Token::LParen => depth += 1,
                Token::RParen => depth -= 1,
                Token::Eof => break,
                _ => {}
            }
            self.advance();
        }
    }

    fn skip_statement(&mut self) {
        while !matches!(self.current(), Token::Semicolon | Token::Eof) {
            self.advance();
        }
    }
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(table: &CreateTable) -> Vec<&ColumnDef> {
        table
            .definitions
            .iter()
            .filter_map(|d| match d {
                Definition::Column(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_parse_simple_table() {
        let sql = r#"
            CREATE TABLE users (
                id INT PRIMARY KEY,
                email VARCHAR(255) NOT NULL UNIQUE
            )
        "#;

        let table = parse_create_table(sql, Dialect::PostgreSQL).unwrap();
        assert_eq!(table.name, "users");

        let cols = columns(&table);
        assert_eq!(cols.len(), 2);
        assert!(cols[0].primary_key);
        assert_eq!(cols[1].name, "email");
        assert!(cols[1].not_null);
        assert!(cols[1].unique);
        assert_eq!(
            cols[1].data_type,
            Some(DataType {
                name: "VARCHAR".to_string(),
                params: vec!["255".to_string()],
            })
        );
    }

    #[test]
    fn test_parse_temporary_if_not_exists() {
        let sql = "CREATE TEMPORARY TABLE IF NOT EXISTS public.sessions (token TEXT)";
        let table = parse_create_table(sql, Dialect::PostgreSQL).unwrap();

        assert!(table.temporary);
        assert!(table.if_not_exists);
        assert_eq!(table.name, "sessions");
    }

    #[test]
    fn test_parse_table_level_foreign_key() {
        let sql = r#"
            CREATE TABLE books (
                id INT,
                author_id INT,
                PRIMARY KEY (id),
                CONSTRAINT fk_author FOREIGN KEY (author_id) REFERENCES authors(id) ON DELETE SET NULL
            )
        "#;

        let table = parse_create_table(sql, Dialect::MySQL).unwrap();
        assert_eq!(table.definitions.len(), 4);
        assert_eq!(
            table.definitions[2],
            Definition::Other(OtherConstraint::PrimaryKey(vec!["id".to_string()]))
        );
        match &table.definitions[3] {
            Definition::ForeignKey(fk) => {
                assert_eq!(fk.name.as_deref(), Some("fk_author"));
                assert_eq!(fk.columns, vec!["author_id".to_string()]);
                assert_eq!(fk.reference.table, "authors");
                assert_eq!(fk.reference.columns, vec!["id".to_string()]);
            }
            other => panic!("expected foreign key, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_inline_reference_and_default() {
        let sql = "CREATE TABLE orders (id SERIAL PRIMARY KEY, customer_id INT REFERENCES customers(id) ON DELETE CASCADE, placed_at TIMESTAMP DEFAULT NOW(), note TEXT DEFAULT 'n/a')";

        let table = parse_create_table(sql, Dialect::PostgreSQL).unwrap();
        let cols = columns(&table);

        assert_eq!(
            cols[1].references,
            Some(Reference {
                table: "customers".to_string(),
                columns: vec!["id".to_string()],
            })
        );
        assert_eq!(cols[2].default.as_deref(), Some("NOW()"));
        assert_eq!(cols[3].default.as_deref(), Some("'n/a'"));
    }

    #[test]
    fn test_parse_mysql_auto_increment() {
        let sql = r#"
            CREATE TABLE users (
                id INT(11) UNSIGNED NOT NULL AUTO_INCREMENT,
                price DECIMAL(10,2),
                KEY idx_price (price)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#;

        let table = parse_create_table(sql, Dialect::MySQL).unwrap();
        let cols = columns(&table);

        assert!(cols[0].auto_increment);
        assert!(cols[0].not_null);
        assert_eq!(cols[1].data_type.as_ref().unwrap().params, vec!["10", "2"]);
        assert!(matches!(
            table.definitions[2],
            Definition::Other(OtherConstraint::Index(_))
        ));
    }

    #[test]
    fn test_missing_type_is_none() {
        let table = parse_create_table("CREATE TABLE t (a, b NOT NULL)", Dialect::SQLite).unwrap();
        let cols = columns(&table);

        assert!(cols[0].data_type.is_none());
        assert!(cols[1].data_type.is_none());
        assert!(cols[1].not_null);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_create_table("CREATE TABLE (id INT)", Dialect::MySQL),
            Err(SqlParseError::Expected { .. })
        ));
        assert_eq!(
            parse_create_table("CREATE TABLE t (id INT", Dialect::MySQL),
            Err(SqlParseError::UnexpectedEof)
        );
        assert!(parse_create_table("CREATE TABLE t AS SELECT 1", Dialect::MySQL).is_err());
        assert!(parse_create_table("CREATE TABLE t (id INT NOT 5)", Dialect::MySQL).is_err());
    }

    #[test]
    fn test_unreserved_words_as_column_names() {
        let sql = "CREATE TABLE readings (id INT AUTO_INCREMENT, temp DECIMAL(4,1), auto BOOLEAN, \
                   increment INT, cascade TEXT, restrict TEXT, exists BOOLEAN, if TEXT, \
                   delete TEXT, update TEXT ON UPDATE CURRENT_TIMESTAMP)";
        let table = parse_create_table(sql, Dialect::MySQL).unwrap();
        let cols = columns(&table);

        let names: Vec<&str> = cols.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "id", "temp", "auto", "increment", "cascade", "restrict", "exists", "if",
                "delete", "update"
            ]
        );
        assert!(cols[0].auto_increment);
        assert_eq!(cols[0].data_type.as_ref().unwrap().name, "INT");
        assert_eq!(cols[1].data_type.as_ref().unwrap().name, "DECIMAL");
        assert_eq!(cols[9].data_type.as_ref().unwrap().name, "TEXT");

        let table = parse_create_table(
            "CREATE TEMP TABLE IF NOT EXISTS temp (x INT REFERENCES other(id) ON DELETE NO ACTION)",
            Dialect::PostgreSQL,
        )
        .unwrap();
        assert!(table.temporary && table.if_not_exists);
        assert_eq!(table.name, "temp");
        assert_eq!(columns(&table).len(), 1);
    }

    #[test]
    fn test_fulltext_and_spatial_indexes() {
        let sql = "CREATE TABLE posts (id INT, body TEXT, place TEXT, \
                   FULLTEXT KEY ft_body (body), SPATIAL INDEX sp_place (place))";
        let table = parse_create_table(sql, Dialect::MySQL).unwrap();

        assert_eq!(columns(&table).len(), 3);
        assert_eq!(
            table.definitions[3],
            Definition::Other(OtherConstraint::Index(vec!["body".to_string()]))
        );
        assert_eq!(
            table.definitions[4],
            Definition::Other(OtherConstraint::Index(vec!["place".to_string()]))
        );

        // A column may still be called fulltext
        let table = parse_create_table("CREATE TABLE t (fulltext TEXT)", Dialect::MySQL).unwrap();
        assert_eq!(columns(&table)[0].name, "fulltext");
    }

    #[test]
    fn test_double_quoted_default() {
        let sql = r#"CREATE TABLE t (status TEXT DEFAULT "new")"#;

        let mysql = parse_create_table(sql, Dialect::MySQL).unwrap();
        assert_eq!(columns(&mysql)[0].default.as_deref(), Some("'new'"));

        let postgres = parse_create_table(sql, Dialect::PostgreSQL).unwrap();
        assert_eq!(columns(&postgres)[0].default.as_deref(), Some("new"));

        let quoted_name = parse_create_table(r#"CREATE TABLE "my t" ("a b" INT)"#, Dialect::PostgreSQL)
            .unwrap();
        assert_eq!(quoted_name.name, "my t");
        assert_eq!(columns(&quoted_name)[0].name, "a b");
    }

    #[test]
    fn test_error_messages_show_sql_text() {
        let err = parse_create_table("CREATE TABLE t (id INT NOT 5)", Dialect::MySQL).unwrap_err();
        assert_eq!(err.to_string(), "Expected NULL, found 5");

        let err = parse_create_table("CREATE TABLE t x", Dialect::MySQL).unwrap_err();
        assert_eq!(err.to_string(), "Expected (, found x");

        let err = parse_create_table("CREATE TABLE t (id INT, ;)", Dialect::MySQL).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected token: ;");
    }
}
