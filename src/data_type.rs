use std::fmt;

use crate::value::Value;

/// Represents the supported data types in the database schema.
/// These types define the structure of columns and the expected format of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A 64-bit signed integer, spelled `int` in `CREATE TABLE`.
    Int,
    /// A variable-length UTF-8 character string, spelled `str` in `CREATE TABLE`.
    Text,
}

impl DataType {
    /// Resolves a type name as written in a column definition.
    ///
    /// Type names are case-sensitive: only `int` and `str` are recognized.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "int" => Some(Self::Int),
            "str" => Some(Self::Text),
            _ => None,
        }
    }

    /// The type name as written in a column definition.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Text => "str",
        }
    }

    /// The value a column of this type holds when an INSERT doesn't provide one.
    pub fn default_value(self) -> Value {
        match self {
            Self::Int => Value::Int(0),
            Self::Text => Value::Text("".into()),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
