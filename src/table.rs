use bitvec::prelude::*;
use log::debug;

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::schema::Schema;
use crate::value::Value;

/// A column position paired with the value to write there.
pub type Assignment = (usize, Value);

/// Row storage for one schema.
///
/// Rows are kept in insertion order and every scan walks them in that order,
/// so query results are stable. All read/delete/update operations are driven
/// by a caller-supplied predicate over a [Row].
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(name: String, schema: Schema) -> Self {
        Self {
            name,
            schema,
            rows: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get_row(&self, row_idx: usize) -> Option<&Row> {
        self.rows.get(row_idx)
    }

    /// Appends a row.
    ///
    /// # Errors
    /// Returns an error if the row doesn't have one cell per column, or if a
    /// cell's type doesn't match its column.
    pub fn insert_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.schema.len() {
            return Err(Error::ArityMismatch {
                expected: self.schema.len(),
                found: row.len(),
            });
        }
        for (value, column) in row.iter().zip(self.schema.columns()) {
            check_type(&column.name, column.data_type, value)?;
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn delete_all(&mut self) {
        self.rows.clear();
    }

    /// Marks every row the predicate accepts.
    ///
    /// The mask is built before any mutation so a predicate never observes a
    /// partially deleted or updated table.
    fn matching<P>(&self, pred: P) -> BitVec
    where
        P: Fn(&Row) -> bool,
    {
        self.rows.iter().map(pred).collect()
    }

    /// Removes every row matching `pred` and returns how many were removed.
    /// Surviving rows keep their relative order.
    pub fn delete_where<P>(&mut self, pred: P) -> usize
    where
        P: Fn(&Row) -> bool,
    {
        let mask = self.matching(pred);
        let removed = mask.count_ones();
        if removed == 0 {
            return 0;
        }

        let mut marks = mask.iter().by_vals();
        self.rows.retain(|_| !marks.next().unwrap_or(false));

        debug!("table {}: deleted {removed} rows", self.name);
        removed
    }

    /// Writes `assignments` into every row matching `pred` and returns how many
    /// rows were updated.
    ///
    /// # Errors
    /// All assignments are validated (index in range, value type matches the
    /// column) before any row is touched, so a failing update changes nothing.
    pub fn update_where<P>(&mut self, pred: P, assignments: &[Assignment]) -> Result<usize>
    where
        P: Fn(&Row) -> bool,
    {
        for (idx, value) in assignments {
            let column = self.schema.column(*idx).ok_or(Error::IndexOutOfRange {
                index: *idx,
                len: self.schema.len(),
            })?;
            check_type(&column.name, column.data_type, value)?;
        }

        let mask = self.matching(pred);
        for row_idx in mask.iter_ones() {
            let row = &mut self.rows[row_idx];
            for (idx, value) in assignments {
                row[*idx] = value.clone();
            }
        }

        let updated = mask.count_ones();
        debug!("table {}: updated {updated} rows", self.name);
        Ok(updated)
    }

    /// Copies every full row matching `pred`, in scan order.
    pub fn rows_where<P>(&self, pred: P) -> Vec<Row>
    where
        P: Fn(&Row) -> bool,
    {
        self.rows.iter().filter(|row| pred(row)).cloned().collect()
    }

    /// Copies the cells at `column_indices` (in that order) of every row
    /// matching `pred`, in scan order.
    ///
    /// # Errors
    /// Returns [Error::IndexOutOfRange] if an index is not a column of the schema.
    pub fn column_rows_where<P>(&self, column_indices: &[usize], pred: P) -> Result<Vec<Row>>
    where
        P: Fn(&Row) -> bool,
    {
        if let Some(&index) = column_indices.iter().find(|&&i| i >= self.schema.len()) {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.schema.len(),
            });
        }

        Ok(self
            .rows
            .iter()
            .filter(|row| pred(row))
            .map(|row| row.project(column_indices))
            .collect())
    }
}

pub(crate) fn check_type(column: &str, data_type: DataType, value: &Value) -> Result<()> {
    if value.fits(data_type) {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            column: column.to_string(),
            expected: data_type,
            found: value.data_type(),
        })
    }
}
