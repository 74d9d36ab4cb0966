use std::collections::HashMap;
use std::fmt;

/// Semantic type of a column, constant, or expression node.
/// `Null` only marks columns that could not be resolved against the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Num,
    Str,
    Bool,
    Null,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Num => "num",
            DataType::Str => "str",
            DataType::Bool => "bool",
            DataType::Null => "null",
        };
        write!(f, "{name}")
    }
}

/// Read-only column catalog supplied by the host application: a name → type
/// mapping plus the single valid table name. Never mutated during a parse.
#[derive(Debug, Clone)]
pub struct Schema {
    table: String,
    columns: HashMap<String, DataType>,
}

impl Schema {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: HashMap::new(),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns.insert(name.into(), data_type);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn column_type(&self, name: &str) -> Option<DataType> {
        self.columns.get(name).copied()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, DataType)> {
        self.columns.iter().map(|(name, &ty)| (name.as_str(), ty))
    }
}
