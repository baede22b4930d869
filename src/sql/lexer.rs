//! Tokenizer for CREATE TABLE statements.
//!
//! Comments and punctuation that carry no structure (operators, `=`, ...) are
//! dropped. Identifier quoting follows the dialect.

use std::fmt;

use super::Dialect;

/// Reserved words get their own variant. Everything else, including words
/// such as `TEMP`, `AUTO_INCREMENT` or `CASCADE` that only act as keywords in
/// certain positions, is an [`Token::Ident`] so it stays usable as a name.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Create,
    Table,
    Not,
    Null,

    // Constraints and column modifiers
    Constraint,
    Primary,
    Foreign,
    Key,
    Unique,
    Index,
    Check,
    References,
    Default,

    Ident(String),
    /// `"..."`: an identifier, or a string literal in MySQL and MariaDB
    Quoted(String),
    Str(String),
    Num(String),

    LParen,
    RParen,
    Comma,
    Semicolon,
    Dot,

    Eof,
}

impl Token {
    fn keyword(word: &str) -> Option<Self> {
        let token = match word.to_ascii_uppercase().as_str() {
            "CREATE" => Self::Create,
            "TABLE" => Self::Table,
            "NOT" => Self::Not,
            "NULL" => Self::Null,
            "CONSTRAINT" => Self::Constraint,
            "PRIMARY" => Self::Primary,
            "FOREIGN" => Self::Foreign,
            "KEY" => Self::Key,
            "UNIQUE" => Self::Unique,
            "INDEX" => Self::Index,
            "CHECK" => Self::Check,
            "REFERENCES" => Self::References,
            "DEFAULT" => Self::Default,
            _ => return None,
        };
        Some(token)
    }

    /// Whether this is the (unreserved) word `word`, ignoring case.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Self::Ident(s) if s.eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: &str = match self {
            Self::Create => "CREATE",
            Self::Table => "TABLE",
            Self::Not => "NOT",
            Self::Null => "NULL",
            Self::Constraint => "CONSTRAINT",
            Self::Primary => "PRIMARY",
            Self::Foreign => "FOREIGN",
            Self::Key => "KEY",
            Self::Unique => "UNIQUE",
            Self::Index => "INDEX",
            Self::Check => "CHECK",
            Self::References => "REFERENCES",
            Self::Default => "DEFAULT",
            Self::Ident(s) | Self::Num(s) => s,
            Self::Quoted(s) => return write!(f, "\"{}\"", s),
            Self::Str(s) => return write!(f, "'{}'", s),
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// Closing delimiter for a quoted identifier opened by `open`.
fn identifier_close(open: char, dialect: Dialect) -> Option<char> {
    match open {
        '`' if dialect.is_mysql_family() => Some('`'),
        '[' if dialect == Dialect::SQLite => Some(']'),
        _ => None,
    }
}

/// Byte-offset scanner over one statement. Yields tokens until the input is
/// exhausted; [`tokenize`] appends the trailing [`Token::Eof`].
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    dialect: Dialect,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, dialect: Dialect) -> Self {
        Self {
            src,
            pos: 0,
            dialect,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume while `pred` holds and return the consumed slice.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn skip_trivia(&mut self) {
        loop {
            self.eat_while(char::is_whitespace);
            let rest = self.rest();
            if rest.starts_with("--") || (rest.starts_with('#') && self.dialect.is_mysql_family()) {
                self.eat_while(|c| c != '\n');
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => self.pos = self.src.len(),
                }
            } else {
                return;
            }
        }
    }

    /// Body of a delimited run; a doubled closing delimiter stands for itself.
    fn delimited(&mut self, close: char, backslash_escapes: bool) -> String {
        self.bump();
        let mut out = String::new();
        while let Some(c) = self.bump() {
            if c == close {
                if close != ']' && self.peek() == Some(close) {
                    self.bump();
                    out.push(close);
                    continue;
                }
                break;
            }
            if c == '\\' && backslash_escapes {
                match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(other) => out.push(other),
                    None => break,
                }
                continue;
            }
            out.push(c);
        }
        out
    }

    fn number(&mut self) -> String {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        self.eat_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
        self.src[start..self.pos].to_string()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            self.skip_trivia();
            let c = self.peek()?;

            let token = match c {
                '(' | ')' | ',' | ';' | '.' => {
                    self.bump();
                    match c {
                        '(' => Token::LParen,
                        ')' => Token::RParen,
                        ',' => Token::Comma,
                        ';' => Token::Semicolon,
                        _ => Token::Dot,
                    }
                }
                '\'' => Token::Str(self.delimited('\'', true)),
                '"' => {
                    let mysql = self.dialect.is_mysql_family();
                    Token::Quoted(self.delimited('"', mysql))
                }
                '-' if self.peek_second().is_some_and(|d| d.is_ascii_digit()) => {
                    Token::Num(self.number())
                }
                c if c.is_ascii_digit() => Token::Num(self.number()),
                c if c.is_alphabetic() || c == '_' => {
                    let word = self.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                    Token::keyword(word).unwrap_or_else(|| Token::Ident(word.to_string()))
                }
                c => match identifier_close(c, self.dialect) {
                    Some(close) => Token::Ident(self.delimited(close, false)),
                    None => {
                        self.bump();
                        continue;
                    }
                },
            };
            return Some(token);
        }
    }
}

/// All tokens of `src`, terminated by [`Token::Eof`].
pub fn tokenize(src: &str, dialect: Dialect) -> Vec<Token> {
    let mut tokens: Vec<Token> = Lexer::new(src, dialect).collect();
    tokens.push(Token::Eof);
    tokens
}
