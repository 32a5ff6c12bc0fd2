use thiserror::Error;

use crate::data_type::DataType;

pub type Result<T> = std::result::Result<T, Error>;

/// The broad class an [Error] belongs to.
///
/// Callers that only care about *why* a statement was rejected (rather than the
/// exact failure) can match on this instead of on every [Error] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The statement text could not be parsed.
    Syntax,
    /// The statement refers to tables or columns that don't fit the schema.
    Schema,
    /// A literal or operator does not fit the type of the column it targets.
    TypeMismatch,
    /// Reading statement text failed.
    Io,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Table {0} already exists in the database")]
    DuplicateTable(String),

    #[error("Table {0} does not exist")]
    TableNotFound(String),

    #[error("Column {0} not found")]
    ColumnNotFound(String),

    #[error("A table needs at least one column")]
    EmptySchema,

    #[error("Arity mismatch: expected {expected} values, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Column index {index} out of range for a schema of {len} columns")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Type mismatch for column {column}: expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: DataType,
    },

    #[error("Operator {op} is not supported on {data_type} column {column}")]
    UnsupportedOperator {
        column: String,
        op: String,
        data_type: DataType,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax(_) => ErrorKind::Syntax,
            Self::DuplicateColumn(_)
            | Self::DuplicateTable(_)
            | Self::TableNotFound(_)
            | Self::ColumnNotFound(_)
            | Self::EmptySchema
            | Self::ArityMismatch { .. }
            | Self::IndexOutOfRange { .. } => ErrorKind::Schema,
            Self::TypeMismatch { .. } | Self::UnsupportedOperator { .. } => {
                ErrorKind::TypeMismatch
            }
            Self::Io(_) => ErrorKind::Io,
        }
    }
}
