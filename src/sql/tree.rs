//! Syntax tree for a single CREATE TABLE statement.

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    /// Unqualified table name; a `schema.` prefix is dropped.
    pub name: String,
    pub temporary: bool,
    pub if_not_exists: bool,
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Column(ColumnDef),
    ForeignKey(ForeignKeyConstraint),
    Other(OtherConstraint),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: Option<DataType>,
    pub not_null: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub auto_increment: bool,
    /// Literal text of the DEFAULT expression, string literals re-quoted.
    pub default: Option<String>,
    pub references: Option<Reference>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
            not_null: false,
            primary_key: false,
            unique: false,
            auto_increment: false,
            default: None,
            references: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataType {
    pub name: String,
    /// Length or precision/scale arguments, e.g. `["10", "2"]`.
    pub params: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub table: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyConstraint {
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub reference: Reference,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OtherConstraint {
    PrimaryKey(Vec<String>),
    Unique(Vec<String>),
    Index(Vec<String>),
    Check,
}
