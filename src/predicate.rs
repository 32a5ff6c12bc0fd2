use crate::ast::{ComparisonOp, Expr};
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::schema::Schema;
use crate::value::Value;

/// A compiled WHERE clause: decides whether a row matches.
pub type Predicate = Box<dyn Fn(&Row) -> bool>;

/// A predicate that accepts every row, used when a statement has no WHERE clause.
pub fn match_all() -> Predicate {
    Box::new(|_| true)
}

/// Compiles a WHERE expression against `schema`.
///
/// Column names and literal types are checked once here rather than per row:
/// - an `int` column must be compared with an integer literal,
/// - a `str` column must be compared with a text literal, and only with `=`
///   or `!=`.
///
/// `AND`/`OR` short-circuit: the right side is not evaluated when the left
/// side already decides the result.
///
/// # Errors
/// - [Error::ColumnNotFound] for an unknown column.
/// - [Error::TypeMismatch] when the literal doesn't fit the column type.
/// - [Error::UnsupportedOperator] for an ordering operator on a `str` column.
pub fn compile(expr: &Expr, schema: &Schema) -> Result<Predicate> {
    match expr {
        Expr::Comparison { column, op, value } => compile_comparison(column, *op, value, schema),
        Expr::And { left, right } => Ok(both(compile(left, schema)?, compile(right, schema)?)),
        Expr::Or { left, right } => Ok(either(compile(left, schema)?, compile(right, schema)?)),
    }
}

/// `right` only runs for rows `left` accepts.
fn both(left: Predicate, right: Predicate) -> Predicate {
    Box::new(move |row| left(row) && right(row))
}

/// `right` only runs for rows `left` rejects.
fn either(left: Predicate, right: Predicate) -> Predicate {
    Box::new(move |row| left(row) || right(row))
}

/// Compiles the optional WHERE clause of a statement; no clause matches every row.
pub fn compile_optional(expr: Option<&Expr>, schema: &Schema) -> Result<Predicate> {
    match expr {
        Some(expr) => compile(expr, schema),
        None => Ok(match_all()),
    }
}

fn compile_comparison(
    column: &str,
    op: ComparisonOp,
    literal: &Value,
    schema: &Schema,
) -> Result<Predicate> {
    let idx = schema.require_index(column)?;
    let data_type = schema.columns()[idx].data_type;

    match (data_type, literal) {
        (DataType::Int, Value::Int(rhs)) => {
            let rhs = *rhs;
            let cmp: fn(i64, i64) -> bool = match op {
                ComparisonOp::Eq => |l, r| l == r,
                ComparisonOp::NotEq => |l, r| l != r,
                ComparisonOp::Lt => |l, r| l < r,
                ComparisonOp::Gt => |l, r| l > r,
                ComparisonOp::LtEq => |l, r| l <= r,
                ComparisonOp::GtEq => |l, r| l >= r,
            };
            Ok(Box::new(move |row| {
                matches!(row.get(idx), Some(Value::Int(l)) if cmp(*l, rhs))
            }))
        }
        (DataType::Text, Value::Text(rhs)) => {
            let rhs = rhs.clone();
            let want_equal = match op {
                ComparisonOp::Eq => true,
                ComparisonOp::NotEq => false,
                ComparisonOp::Lt | ComparisonOp::Gt | ComparisonOp::LtEq | ComparisonOp::GtEq => {
                    return Err(Error::UnsupportedOperator {
                        column: column.to_string(),
                        op: op.to_string(),
                        data_type,
                    });
                }
            };
            Ok(Box::new(move |row| match row.get(idx) {
                Some(Value::Text(l)) => (**l == *rhs) == want_equal,
                _ => false,
            }))
        }
        (DataType::Int, Value::Text(_)) | (DataType::Text, Value::Int(_)) => {
            Err(Error::TypeMismatch {
                column: column.to_string(),
                expected: data_type,
                found: literal.data_type(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::ColumnDef;

    fn schema() -> Schema {
        Schema::new(vec![
            ColumnDef::new("c1", DataType::Text),
            ColumnDef::new("c2", DataType::Int),
        ])
        .unwrap()
    }

    fn row(c1: &str, c2: i64) -> Row {
        Row::new(vec![Value::from(c1), Value::Int(c2)])
    }

    fn cmp(column: &str, op: ComparisonOp, value: impl Into<Value>) -> Expr {
        Expr::comparison(column, op, value)
    }

    #[test]
    fn test_int_comparisons() {
        let schema = schema();
        let r = row("a", 5);

        let cases = [
            (ComparisonOp::Eq, 5, true),
            (ComparisonOp::Eq, 4, false),
            (ComparisonOp::NotEq, 4, true),
            (ComparisonOp::Lt, 6, true),
            (ComparisonOp::Lt, 5, false),
            (ComparisonOp::Gt, 4, true),
            (ComparisonOp::Gt, 5, false),
            (ComparisonOp::LtEq, 5, true),
            (ComparisonOp::GtEq, 5, true),
            (ComparisonOp::GtEq, 6, false),
        ];
        for (op, rhs, expected) in cases {
            let pred = compile(&cmp("c2", op, rhs as i64), &schema).unwrap();
            assert_eq!(pred(&r), expected, "c2 {op} {rhs}");
        }
    }

    #[test]
    fn test_text_equality() {
        let schema = schema();

        let eq = compile(&cmp("c1", ComparisonOp::Eq, "a"), &schema).unwrap();
        let ne = compile(&cmp("c1", ComparisonOp::NotEq, "a"), &schema).unwrap();

        assert!(eq(&row("a", 1)));
        assert!(!eq(&row("b", 1)));
        assert!(!ne(&row("a", 1)));
        assert!(ne(&row("b", 1)));
    }

    #[test]
    fn test_text_rejects_ordering_operators() {
        let schema = schema();

        for op in [
            ComparisonOp::Lt,
            ComparisonOp::Gt,
            ComparisonOp::LtEq,
            ComparisonOp::GtEq,
        ] {
            let err = compile(&cmp("c1", op, "a"), &schema).err().unwrap();
            assert!(matches!(err, Error::UnsupportedOperator { .. }));
            assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        }
    }

    #[test]
    fn test_literal_type_must_match_column() {
        let schema = schema();

        let err = compile(&cmp("c1", ComparisonOp::GtEq, 2_i64), &schema)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let err = compile(&cmp("c2", ComparisonOp::Eq, "2"), &schema)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: DataType::Int,
                found: DataType::Text,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_column() {
        let err = compile(&cmp("nope", ComparisonOp::Eq, 1_i64), &schema())
            .err()
            .unwrap();
        assert!(matches!(err, Error::ColumnNotFound(ref c) if c == "nope"));
    }

    #[test]
    fn test_errors_in_nested_branches_are_reported() {
        let expr = Expr::or(
            cmp("c2", ComparisonOp::Eq, 1_i64),
            Expr::and(
                cmp("c2", ComparisonOp::Eq, 2_i64),
                cmp("c1", ComparisonOp::Lt, "x"),
            ),
        );
        assert!(compile(&expr, &schema()).is_err());
    }

    #[test]
    fn test_and_or() {
        let schema = schema();
        let expr = Expr::or(
            cmp("c1", ComparisonOp::Eq, "a"),
            Expr::and(
                cmp("c2", ComparisonOp::Gt, 1_i64),
                cmp("c2", ComparisonOp::Lt, 10_i64),
            ),
        );
        let pred = compile(&expr, &schema).unwrap();

        assert!(pred(&row("a", 100)));
        assert!(pred(&row("b", 5)));
        assert!(!pred(&row("b", 10)));
        assert!(!pred(&row("b", 1)));
    }

    /// A predicate returning `result` that counts how often it runs.
    fn counting(result: bool, calls: &Rc<Cell<usize>>) -> Predicate {
        let calls = Rc::clone(calls);
        Box::new(move |_| {
            calls.set(calls.get() + 1);
            result
        })
    }

    #[test]
    fn test_and_or_short_circuit() {
        let r = row("a", 1);

        let calls = Rc::new(Cell::new(0));
        assert!(!both(counting(false, &calls), counting(true, &calls))(&r));
        assert_eq!(calls.get(), 1);

        let calls = Rc::new(Cell::new(0));
        assert!(both(counting(true, &calls), counting(true, &calls))(&r));
        assert_eq!(calls.get(), 2);

        let calls = Rc::new(Cell::new(0));
        assert!(either(counting(true, &calls), counting(false, &calls))(&r));
        assert_eq!(calls.get(), 1);

        let calls = Rc::new(Cell::new(0));
        assert!(!either(counting(false, &calls), counting(false, &calls))(&r));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_compile_optional() {
        let schema = schema();
        let all = compile_optional(None, &schema).unwrap();
        assert!(all(&row("x", 0)));

        let some = compile_optional(Some(&cmp("c2", ComparisonOp::Eq, 3_i64)), &schema).unwrap();
        assert!(!some(&row("x", 0)));
    }
}
