//! Per-dialect type metadata.
//!
//! Static lookup data consulted by the generator and validators. The parse
//! pipeline itself never reads it.

use super::Dialect;

const MYSQL_REQUIRED_LENGTH: &[&str] = &["CHAR", "VARCHAR", "BINARY", "VARBINARY", "BIT"];

const POSTGRES_REQUIRED_LENGTH: &[&str] = &[
    "CHAR",
    "CHARACTER",
    "VARCHAR",
    "CHARACTER VARYING",
    "BIT",
    "BIT VARYING",
];

const MARIADB_REQUIRED_LENGTH: &[&str] = &[
    "CHAR",
    "CHARACTER",
    "VARCHAR",
    "CHAR VARYING",
    "CHARACTER VARYING",
    "BINARY",
    "VARBINARY",
    "CHAR BYTE",
    "BIT",
    "NATIONAL CHAR",
    "NATIONAL VARCHAR",
    "NCHAR",
    "NVARCHAR",
];

const MYSQL_OPTIONAL_LENGTH: &[&str] = &[
    "TINYINT",
    "SMALLINT",
    "MEDIUMINT",
    "INT",
    "INTEGER",
    "BIGINT",
    "DECIMAL",
    "NUMERIC",
    "FLOAT",
    "DOUBLE",
];

const POSTGRES_OPTIONAL_LENGTH: &[&str] = &[
    "DECIMAL",
    "NUMERIC",
    "TIME",
    "TIMESTAMP",
    "TIMESTAMPTZ",
    "INTERVAL",
];

const SQLITE_OPTIONAL_LENGTH: &[&str] = &[
    "CHARACTER",
    "VARCHAR",
    "VARYING CHARACTER",
    "NCHAR",
    "NATIVE CHARACTER",
    "NVARCHAR",
    "NUMERIC",
    "DECIMAL",
];

const MARIADB_OPTIONAL_LENGTH: &[&str] = &[
    "TINYINT",
    "SMALLINT",
    "MEDIUMINT",
    "INT",
    "INTEGER",
    "BIGINT",
    "INT1",
    "INT2",
    "INT3",
    "INT4",
    "INT8",
    "MIDDLEINT",
    "DECIMAL",
    "DEC",
    "NUMERIC",
    "FIXED",
    "NUMBER",
    "FLOAT",
    "FLOAT4",
    "FLOAT8",
    "DOUBLE",
    "DOUBLE PRECISION",
    "REAL",
    "TIME",
    "DATETIME",
    "TIMESTAMP",
];

fn required_length_types(dialect: Dialect) -> &'static [&'static str] {
    match dialect {
        Dialect::MySQL => MYSQL_REQUIRED_LENGTH,
        Dialect::PostgreSQL => POSTGRES_REQUIRED_LENGTH,
        Dialect::SQLite => &[],
        Dialect::MariaDB => MARIADB_REQUIRED_LENGTH,
    }
}

fn optional_length_types(dialect: Dialect) -> &'static [&'static str] {
    match dialect {
        Dialect::MySQL => MYSQL_OPTIONAL_LENGTH,
        Dialect::PostgreSQL => POSTGRES_OPTIONAL_LENGTH,
        Dialect::SQLite => SQLITE_OPTIONAL_LENGTH,
        Dialect::MariaDB => MARIADB_OPTIONAL_LENGTH,
    }
}

/// Whether `base_type` must carry a length in this dialect.
pub fn requires_length(base_type: &str, dialect: Dialect) -> bool {
    let upper = base_type.to_uppercase();
    required_length_types(dialect).contains(&upper.as_str())
}

/// Whether `base_type` accepts a length at all.
pub fn can_have_length(base_type: &str, dialect: Dialect) -> bool {
    let upper = base_type.to_uppercase();
    required_length_types(dialect).contains(&upper.as_str())
        || optional_length_types(dialect).contains(&upper.as_str())
}

/// PostgreSQL expresses auto-increment through SERIAL types instead of a
/// column modifier.
pub fn supports_auto_increment(dialect: Dialect) -> bool {
    dialect != Dialect::PostgreSQL
}

/// Modifier keyword for auto-increment columns, if the dialect has one.
pub fn auto_increment_keyword(dialect: Dialect) -> Option<&'static str> {
    match dialect {
        Dialect::MySQL | Dialect::MariaDB => Some("AUTO_INCREMENT"),
        Dialect::SQLite => Some("AUTOINCREMENT"),
        Dialect::PostgreSQL => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_length() {
        assert!(requires_length("varchar", Dialect::MySQL));
        assert!(requires_length("CHARACTER VARYING", Dialect::PostgreSQL));
        assert!(!requires_length("VARCHAR", Dialect::SQLite));
        assert!(!requires_length("INT", Dialect::MySQL));
    }

    #[test]
    fn test_optional_length() {
        assert!(can_have_length("INT", Dialect::MySQL));
        assert!(can_have_length("VARCHAR", Dialect::SQLite));
        assert!(can_have_length("NUMERIC", Dialect::PostgreSQL));
        assert!(!can_have_length("TEXT", Dialect::PostgreSQL));
    }

    #[test]
    fn test_auto_increment_support() {
        assert!(!supports_auto_increment(Dialect::PostgreSQL));
        assert_eq!(auto_increment_keyword(Dialect::SQLite), Some("AUTOINCREMENT"));
        assert_eq!(auto_increment_keyword(Dialect::MariaDB), Some("AUTO_INCREMENT"));
    }
}
