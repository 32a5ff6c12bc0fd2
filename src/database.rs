use std::collections::HashMap;

use log::{debug, info};

use crate::{
    ast::Statement,
    error::{Error, Result},
    executor::{self, Outcome, QueryResult, StatementExecutor},
    parser,
    reader::StatementReader,
    schema::Schema,
    table::Table,
};

/// The main entry point for the in-memory database engine.
/// It manages a collection of tables and orchestrates query execution.
#[derive(Debug, Default)]
pub struct Database {
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
}

impl Database {
    /// Creates a new, empty database instance.
    pub fn new() -> Self {
        Self {
            tables: HashMap::default(),
        }
    }

    /// Creates a new table in the database.
    ///
    /// # Errors
    /// Returns [Error::DuplicateTable] if a table with the same name already exists.
    pub fn create_table(&mut self, name: String, schema: Schema) -> Result<()> {
        if self.tables.contains_key(&name) {
            return Err(Error::DuplicateTable(name));
        }
        info!("creating table {name} ({} columns)", schema.len());
        let table = Table::new(name.clone(), schema);
        self.tables.insert(name, table);
        Ok(())
    }

    /// Retrieves a reference to a table by name.
    ///
    /// # Errors
    /// Returns [Error::TableNotFound] if no such table exists.
    pub fn get_table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Retrieves a mutable reference to a table by name.
    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns a list of all table names currently stored in the database.
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Runs an already parsed statement.
    pub fn run(&mut self, statement: Statement) -> Result<Outcome> {
        StatementExecutor::new(self).execute(statement)
    }

    /// Parses and executes one SQL statement.
    ///
    /// # Errors
    /// Returns an error if tokenization, parsing, or execution fails.
    ///
    /// # Example
    /// ```
    /// use memdb::{Database, Outcome, Value};
    /// let mut db = Database::new();
    /// db.execute("CREATE TABLE users (id int)").unwrap();
    /// db.execute("INSERT INTO users VALUES (1), (20)").unwrap();
    ///
    /// let deleted = db.execute("DELETE FROM users WHERE id > 12").unwrap();
    /// assert_eq!(deleted, Outcome::Affected(1));
    ///
    /// let result = db.query("SELECT * FROM users").unwrap();
    /// assert_eq!(result.rows[0][0], Value::Int(1));
    /// ```
    pub fn execute(&mut self, sql: &str) -> Result<Outcome> {
        let statement = parser::parse_statement(sql)?;
        self.run(statement)
    }

    /// Executes a `SELECT` query and returns the resulting data set.
    ///
    /// # Example
    ///
    /// ```
    /// use memdb::{Database, Value};
    ///
    /// let mut db = Database::new();
    /// db.execute("CREATE TABLE products (name str, price int)").unwrap();
    /// db.execute("INSERT INTO products VALUES ('Laptop', 1200)").unwrap();
    /// db.execute("INSERT INTO products VALUES ('Mouse', 25)").unwrap();
    ///
    /// let result = db.query("SELECT name FROM products").unwrap();
    ///
    /// assert_eq!(result.columns, vec!["name"]);
    /// assert_eq!(result.rows.len(), 2);
    /// assert_eq!(result.rows[0][0], Value::from("Laptop"));
    /// assert_eq!(result.rows[1][0], Value::from("Mouse"));
    /// ```
    ///
    /// # Errors
    /// Returns a syntax error without executing anything when `sql` is not a
    /// `SELECT`, and the usual parse/schema/type errors otherwise.
    pub fn query(&self, sql: &str) -> Result<QueryResult> {
        let statement = parser::parse_statement(sql)?;

        let Statement::Select(select) = statement else {
            return Err(Error::syntax(format!(
                "{} is not a query, use execute instead",
                statement.kind()
            )));
        };

        executor::select_rows(self, &select)
    }

    /// Executes every `;`-separated statement of `script` in order.
    ///
    /// Each statement gets its own result; a failing statement does not stop
    /// the ones after it.
    pub fn execute_script(&mut self, script: &str) -> Vec<Result<Outcome>> {
        let mut reader = StatementReader::new(script.as_bytes());
        let mut results = Vec::new();

        loop {
            match reader.next_statement() {
                Ok(Some(sql)) => results.push(self.execute(&sql)),
                Ok(None) => break,
                Err(e) => {
                    results.push(Err(e));
                    break;
                }
            }
        }

        debug!("script: ran {} statements", results.len());
        results
    }
}
