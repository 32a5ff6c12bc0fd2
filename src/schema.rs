use std::collections::HashMap;

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;

/// Column definition in the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// The ordered, uniquely-named list of columns that defines a table's row shape.
///
/// A lookup map from column name to position is kept next to the column list
/// so that statements can resolve names without scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnDef>,
    name_to_index: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema from its column definitions.
    ///
    /// # Errors
    /// - [Error::EmptySchema] if `columns` is empty.
    /// - [Error::DuplicateColumn] if two columns share a name.
    ///
    /// # Example
    /// ```
    /// # use memdb::{ColumnDef, DataType, Schema};
    /// let schema = Schema::new(vec![
    ///     ColumnDef::new("c1", DataType::Text),
    ///     ColumnDef::new("c2", DataType::Int),
    /// ])
    /// .unwrap();
    /// assert_eq!(schema.index_of("c2"), Some(1));
    ///
    /// let dup = Schema::new(vec![
    ///     ColumnDef::new("c", DataType::Int),
    ///     ColumnDef::new("c", DataType::Text),
    /// ]);
    /// assert!(dup.is_err());
    /// ```
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::EmptySchema);
        }
        let mut name_to_index = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            if name_to_index.insert(column.name.clone(), i).is_some() {
                return Err(Error::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self {
            columns,
            name_to_index,
        })
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Returns the column at position `i`, if any.
    pub fn column(&self, i: usize) -> Option<&ColumnDef> {
        self.columns.get(i)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Like [Schema::index_of] but fails with [Error::ColumnNotFound].
    pub fn require_index(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Returns `true` if every name in `names` is a column of this schema.
    pub fn columns_present<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().all(|n| self.index_of(n.as_ref()).is_some())
    }

    /// Default value for column `i`: `0` for `int`, `""` for `str`.
    pub fn default_value(&self, i: usize) -> Result<Value> {
        self.columns
            .get(i)
            .map(|c| c.data_type.default_value())
            .ok_or(Error::IndexOutOfRange {
                index: i,
                len: self.len(),
            })
    }

    /// A full row made only of column defaults.
    pub(crate) fn default_row(&self) -> Vec<Value> {
        self.columns
            .iter()
            .map(|c| c.data_type.default_value())
            .collect()
    }
}
