use std::fmt;

use crate::{Schema, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    Insert(Insert),
    Delete(Delete),
    Update(Update),
    Select(Select),
}

impl Statement {
    /// The statement keyword(s), for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::CreateTable(_) => "CREATE TABLE",
            Statement::Insert(_) => "INSERT",
            Statement::Delete(_) => "DELETE",
            Statement::Update(_) => "UPDATE",
            Statement::Select(_) => "SELECT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    /// Explicit column order for the tuples; `None` means schema order.
    pub columns: Option<Vec<String>>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    /// `None` deletes every row.
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnsSelect {
    Star,
    ColumnsNames(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub columns: ColumnsSelect,
    pub table: String,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl ComparisonOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::NotEq => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Gt => ">",
            ComparisonOp::LtEq => "<=",
            ComparisonOp::GtEq => ">=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A WHERE clause: comparisons combined with `AND`/`OR`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Comparison {
        column: String,
        op: ComparisonOp,
        value: Value,
    },
    And {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Or {
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn comparison(column: impl Into<String>, op: ComparisonOp, value: impl Into<Value>) -> Self {
        Expr::Comparison {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Fully parenthesized rendering, so the tree shape is visible in logs.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Comparison { column, op, value } => match value {
                Value::Int(i) => write!(f, "{column} {op} {i}"),
                Value::Text(s) => write!(f, "{column} {op} '{s}'"),
            },
            Expr::And { left, right } => write!(f, "({left} AND {right})"),
            Expr::Or { left, right } => write!(f, "({left} OR {right})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_display_shows_grouping() {
        let expr = Expr::or(
            Expr::comparison("a", ComparisonOp::Eq, 1_i64),
            Expr::and(
                Expr::comparison("b", ComparisonOp::NotEq, "x"),
                Expr::comparison("c", ComparisonOp::GtEq, 3_i64),
            ),
        );
        assert_eq!(expr.to_string(), "(a = 1 OR (b != 'x' AND c >= 3))");
    }
}
