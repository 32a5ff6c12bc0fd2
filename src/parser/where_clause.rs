//! WHERE clause grammar, lowest precedence first:
//!
//! ```text
//! or_expr    := and_expr (OR and_expr)*
//! and_expr   := primary (AND primary)*
//! primary    := '(' or_expr ')' | comparison
//! comparison := ident op literal
//! ```
//!
//! Chains at the same level fold to the left: `a AND b AND c` is
//! `And(And(a, b), c)`.

use super::Parser;
use crate::ast::{ComparisonOp, Expr};
use crate::error::{Error, Result};
use crate::tokenizer::Token;

impl Parser {
    /// Parses a whole WHERE tail; anything left after the expression is an error.
    pub(super) fn parse_where(&mut self) -> Result<Expr> {
        let expr = self.parse_or()?;
        if !self.is_at_end() {
            return Err(Error::syntax(format!(
                "Unexpected token after WHERE expression: {:?}",
                self.current_token()
            )));
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while matches!(self.current_token(), Token::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_primary()?;
        while matches!(self.current_token(), Token::And) {
            self.advance();
            let right = self.parse_primary()?;
            left = Expr::and(left, right);
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        if matches!(self.current_token(), Token::LeftParen) {
            self.advance();
            let inner = self.parse_or()?;
            self.consume(Token::RightParen)?;
            return Ok(inner);
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let column = self.consume_ident()?;
        let op = self.consume_comparison_op()?;
        let value = self.consume_literal()?;
        Ok(Expr::Comparison { column, op, value })
    }

    fn consume_comparison_op(&mut self) -> Result<ComparisonOp> {
        let op = match self.current_token() {
            Token::Equal => ComparisonOp::Eq,
            Token::NotEqual => ComparisonOp::NotEq,
            Token::Lower => ComparisonOp::Lt,
            Token::Greater => ComparisonOp::Gt,
            Token::LowerEqual => ComparisonOp::LtEq,
            Token::GreaterEqual => ComparisonOp::GtEq,
            other => {
                return Err(Error::syntax(format!(
                    "Expected comparison operator, found {other:?}"
                )));
            }
        };
        self.advance();
        Ok(op)
    }
}
