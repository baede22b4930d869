//! CREATE TABLE syntax: dialects, tokenizer, parser and syntax tree.

mod dialect;
mod lexer;
mod parser;
pub mod tree;
pub mod types;

pub use dialect::Dialect;
pub use lexer::Token;
pub use parser::{SqlParseError, parse_create_table};
