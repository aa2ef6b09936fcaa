use serde::{Deserialize, Serialize};

/// Declarative description of one table: a name plus its columns in
/// declared order. The auto-incrementing `id` primary key is implicit and
/// must not appear in `columns`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub table: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Entity {
    pub fn new(table: impl Into<String>, columns: Vec<Column>) -> Self {
        Entity {
            table: table.into(),
            columns,
        }
    }
}

/// A single column: name, declared type, optional default value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub default: Option<DefaultValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Column {
            name: name.into(),
            column_type,
            default: None,
        }
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// Column type enumeration. Booleans are stored as integers (0 = false).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Int,
    Text,
    Bool,
    Long,
    Real,
    Blob,
}

impl ColumnType {
    /// SQLite type affinity for this column type.
    pub fn affinity(&self) -> &'static str {
        match self {
            ColumnType::Int => "INT",
            ColumnType::Text => "TEXT NOT NULL",
            ColumnType::Bool => "BOOL",
            ColumnType::Long => "BIGINT",
            ColumnType::Real => "REAL",
            ColumnType::Blob => "BLOB",
        }
    }
}

/// Default value for a column, as written into the CREATE statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
}

impl DefaultValue {
    /// Render as a SQL literal. Text is single-quoted with quotes doubled.
    pub fn to_sql_literal(&self) -> String {
        match self {
            DefaultValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            DefaultValue::Int(n) => n.to_string(),
            DefaultValue::Real(f) => f.to_string(),
            DefaultValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }
}
