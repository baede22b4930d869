pub mod extract;
pub mod generator;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod relations;
pub mod split;
pub mod sql;
pub mod validate;

use thiserror::Error;
use wasm_bindgen::prelude::*;

use generator::generate_sql;
use layout::{InvalidLayoutConfig, LayoutConfig};
use model::Schema;
use pipeline::parse_sql;
use sql::Dialect;

pub use model::ParseResult;
pub use pipeline::{ParseOptions, parse_sql_with};

/// Errors decoding input handed over from JavaScript or the command line.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Unknown SQL dialect: {0}")]
    UnknownDialect(String),
    #[error("Invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Layout(#[from] InvalidLayoutConfig),
}

/// Look up a dialect by name, e.g. `mysql` or `postgresql`.
pub fn decode_dialect(name: &str) -> Result<Dialect, SchemaError> {
    Dialect::from_str(name).ok_or_else(|| SchemaError::UnknownDialect(name.to_string()))
}

/// Decode a schema previously produced by [`parse_sql`].
pub fn decode_schema(json: &str) -> Result<Schema, SchemaError> {
    Ok(serde_json::from_str(json)?)
}

/// Decode and check layout overrides; missing fields keep their defaults.
pub fn decode_layout_config(json: &str) -> Result<LayoutConfig, SchemaError> {
    let config: LayoutConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Parse a SQL script to a `ParseResult` JSON string
#[wasm_bindgen(js_name = "parseSql")]
pub fn parse_sql_json(
    sql: &str,
    dialect: &str,
    reset_positions: bool,
    previous: Option<String>,
) -> Result<String, String> {
    let dialect = decode_dialect(dialect).map_err(|e| e.to_string())?;
    let previous = previous
        .as_deref()
        .map(decode_schema)
        .transpose()
        .map_err(|e| e.to_string())?;

    let result = parse_sql(sql, dialect, previous.as_ref(), reset_positions);
    serde_json::to_string(&result).map_err(|e| e.to_string())
}

/// Render a schema JSON string back to CREATE TABLE statements
#[wasm_bindgen(js_name = "generateSql")]
pub fn generate_sql_json(schema: &str, dialect: &str) -> Result<String, String> {
    let dialect = decode_dialect(dialect).map_err(|e| e.to_string())?;
    let schema = decode_schema(schema).map_err(|e| e.to_string())?;
    Ok(generate_sql(&schema.tables, dialect))
}

/// Sample script for a dialect
#[wasm_bindgen(js_name = "exampleSql")]
pub fn example_sql(dialect: &str) -> Result<String, String> {
    let dialect = decode_dialect(dialect).map_err(|e| e.to_string())?;
    Ok(dialect.example_sql().to_string())
}
