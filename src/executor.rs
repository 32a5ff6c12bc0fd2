use log::debug;

use crate::ast::{Assignment, ColumnsSelect, CreateTable, Delete, Insert, Select, Statement, Update};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::predicate;
use crate::row::Row;
use crate::schema::Schema;
use crate::table;
use crate::value::Value;

/// Represents the result of a successful `SELECT` query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// The names of the columns included in the result set, in projection order.
    pub columns: Vec<String>,
    /// The matching rows, in table scan order, each holding one cell per
    /// entry of `columns`.
    pub rows: Vec<Row>,
}

/// What executing one statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `CREATE TABLE` registered a new table.
    TableCreated(String),
    /// `INSERT`, `UPDATE` or `DELETE` touched this many rows.
    Affected(usize),
    /// `SELECT` rows.
    Rows(QueryResult),
}

/// Validates parsed statements against the schema of the table they target
/// and runs them.
///
/// Every name is resolved to a column index and every literal type-checked
/// before the table is scanned, so unknown columns and type mismatches never
/// leave a statement half applied. The one exception is multi-tuple INSERT:
/// tuples are inserted one at a time and earlier tuples stay when a later one
/// is rejected.
pub struct StatementExecutor<'db> {
    db: &'db mut Database,
}

impl<'db> StatementExecutor<'db> {
    pub fn new(db: &'db mut Database) -> Self {
        Self { db }
    }

    pub fn execute(&mut self, statement: Statement) -> Result<Outcome> {
        match statement {
            Statement::CreateTable(create) => {
                let name = create.name.clone();
                self.exec_create_table(create)?;
                Ok(Outcome::TableCreated(name))
            }
            Statement::Insert(insert) => self.exec_insert(&insert).map(Outcome::Affected),
            Statement::Delete(delete) => self.exec_delete(&delete).map(Outcome::Affected),
            Statement::Update(update) => self.exec_update(&update).map(Outcome::Affected),
            Statement::Select(select) => self.exec_select(&select).map(Outcome::Rows),
        }
    }

    pub fn exec_create_table(&mut self, create: CreateTable) -> Result<()> {
        self.db.create_table(create.name, create.schema)
    }

    /// Inserts every VALUES tuple and returns how many rows were added.
    pub fn exec_insert(&mut self, insert: &Insert) -> Result<usize> {
        let table = self.db.get_table_mut(&insert.table)?;
        let order = compile_insert_column_order(insert.columns.as_deref(), table.schema())?;

        let mut inserted = 0;
        for values in &insert.rows {
            let row = make_row_for_insert(values, &order, table.schema())?;
            table.insert_row(row)?;
            inserted += 1;
        }

        debug!("table {}: inserted {inserted} rows", insert.table);
        Ok(inserted)
    }

    /// Deletes the rows matching the WHERE clause (all rows without one) and
    /// returns how many were removed.
    pub fn exec_delete(&mut self, delete: &Delete) -> Result<usize> {
        let table = self.db.get_table_mut(&delete.table)?;

        match &delete.where_clause {
            Some(expr) => {
                let pred = predicate::compile(expr, table.schema())?;
                Ok(table.delete_where(pred))
            }
            None => {
                let removed = table.row_count();
                table.delete_all();
                debug!("table {}: deleted all {removed} rows", delete.table);
                Ok(removed)
            }
        }
    }

    /// Applies the SET assignments to the rows matching the WHERE clause (all
    /// rows without one) and returns how many were updated.
    pub fn exec_update(&mut self, update: &Update) -> Result<usize> {
        let table = self.db.get_table_mut(&update.table)?;
        let assignments = compile_assignments(&update.assignments, table.schema())?;
        let pred = predicate::compile_optional(update.where_clause.as_ref(), table.schema())?;
        table.update_where(pred, &assignments)
    }

    pub fn exec_select(&self, select: &Select) -> Result<QueryResult> {
        select_rows(&*self.db, select)
    }
}

/// Runs a SELECT; shared by the executor and [Database::query], which only
/// needs read access.
pub(crate) fn select_rows(db: &Database, select: &Select) -> Result<QueryResult> {
    let table = db.get_table(&select.table)?;
    let schema = table.schema();
    let pred = predicate::compile_optional(select.where_clause.as_ref(), schema)?;

    let result = match &select.columns {
        ColumnsSelect::Star => QueryResult {
            columns: schema.column_names(),
            rows: table.rows_where(pred),
        },
        ColumnsSelect::ColumnsNames(names) => {
            let indices = compile_projection(&select.columns, schema)?;
            QueryResult {
                columns: names.clone(),
                rows: table.column_rows_where(&indices, pred)?,
            }
        }
    };

    debug!(
        "table {}: selected {} rows",
        select.table,
        result.rows.len()
    );
    Ok(result)
}

/// Resolves a SELECT projection to column indices; `*` is every column in
/// schema order.
pub fn compile_projection(columns: &ColumnsSelect, schema: &Schema) -> Result<Vec<usize>> {
    match columns {
        ColumnsSelect::Star => Ok((0..schema.len()).collect()),
        ColumnsSelect::ColumnsNames(names) => names
            .iter()
            .map(|name| schema.require_index(name))
            .collect(),
    }
}

/// Resolves each `SET column = value` to a column index and checks the value
/// fits the column type.
pub fn compile_assignments(
    assignments: &[Assignment],
    schema: &Schema,
) -> Result<Vec<table::Assignment>> {
    assignments
        .iter()
        .map(|a| {
            let idx = schema.require_index(&a.column)?;
            check_fits(schema, idx, &a.value)?;
            Ok((idx, a.value.clone()))
        })
        .collect()
}

/// Column index each literal of an INSERT tuple goes to: the explicit column
/// list when present, schema order otherwise.
///
/// # Errors
/// Fails on an unknown column or a column named twice.
pub fn compile_insert_column_order(
    columns: Option<&[String]>,
    schema: &Schema,
) -> Result<Vec<usize>> {
    let Some(columns) = columns else {
        return Ok((0..schema.len()).collect());
    };

    let mut order = Vec::with_capacity(columns.len());
    for name in columns {
        let idx = schema.require_index(name)?;
        if order.contains(&idx) {
            return Err(Error::DuplicateColumn(name.clone()));
        }
        order.push(idx);
    }
    Ok(order)
}

/// Builds a full row for one VALUES tuple: column defaults, overlaid with the
/// tuple's literals at their resolved positions.
pub fn make_row_for_insert(values: &[Value], order: &[usize], schema: &Schema) -> Result<Row> {
    if values.len() != order.len() {
        return Err(Error::ArityMismatch {
            expected: order.len(),
            found: values.len(),
        });
    }

    let mut cells = schema.default_row();
    for (value, &idx) in values.iter().zip(order) {
        check_fits(schema, idx, value)?;
        cells[idx] = value.clone();
    }
    Ok(Row::new(cells))
}

fn check_fits(schema: &Schema, idx: usize, value: &Value) -> Result<()> {
    let column = schema.column(idx).ok_or(Error::IndexOutOfRange {
        index: idx,
        len: schema.len(),
    })?;
    table::check_type(&column.name, column.data_type, value)
}
