pub mod ast;
pub mod config;
pub mod data_type;
pub mod database;
pub mod error;
pub mod executor;
pub mod parser;
pub mod predicate;
pub mod printer;
pub mod reader;
pub mod row;
pub mod schema;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use data_type::DataType;
pub use database::Database;
pub use error::{Error, ErrorKind, Result};
pub use executor::{Outcome, QueryResult};
pub use row::Row;
pub use schema::{ColumnDef, Schema};
pub use table::Table;
pub use value::Value;
