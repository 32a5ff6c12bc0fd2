use std::fmt;
use std::sync::Arc;

use crate::data_type::DataType;

/// Represents a single data value stored in the database.
///
/// There is no `NULL`: every cell holds either an integer or a string, and
/// missing INSERT values are filled with the column's default instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A 64-bit signed integer value.
    Int(i64),
    /// A UTF-8 string value, wrapped in an [Arc] for cheap cloning when rows
    /// are copied into query results.
    Text(Arc<str>),
}

impl Value {
    /// Returns the inner integer value if this is a [Value::Int].
    /// Otherwise, returns `None`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Text(_) => None,
        }
    }

    /// Returns a reference to the inner string slice if this is a [Value::Text].
    /// Otherwise, returns `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// Returns the logical [DataType] corresponding to this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::Text(_) => DataType::Text,
        }
    }

    /// Returns `true` if this value can be stored in a column of type `data_type`.
    pub fn fits(&self, data_type: DataType) -> bool {
        self.data_type() == data_type
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value.into())
    }
}
