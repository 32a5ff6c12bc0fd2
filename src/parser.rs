mod where_clause;

use log::debug;

use crate::error::{Error, Result};
use crate::tokenizer::{Token, Tokenizer};
use crate::{ColumnDef, DataType, Schema, Value, ast::*};

/// Parses a single statement.
///
/// Surrounding whitespace and one trailing `;` are accepted.
///
/// # Example
/// ```
/// # use memdb::parser::parse_statement;
/// # use memdb::ast::{ComparisonOp, Expr, Statement};
/// let statement = parse_statement("DELETE FROM t WHERE a = 1 OR b = 2 AND c = 3;").unwrap();
/// let Statement::Delete(delete) = statement else { panic!("expected DELETE") };
///
/// let expected = Expr::or(
///     Expr::comparison("a", ComparisonOp::Eq, 1_i64),
///     Expr::and(
///         Expr::comparison("b", ComparisonOp::Eq, 2_i64),
///         Expr::comparison("c", ComparisonOp::Eq, 3_i64),
///     ),
/// );
/// assert_eq!(delete.where_clause, Some(expected));
/// ```
pub fn parse_statement(sql: &str) -> Result<Statement> {
    let tokens = Tokenizer::new(sql).tokenize()?;
    Parser::new(tokens).parse()
}

/// Parses every `;`-separated statement of `script`, skipping empty ones.
///
/// # Errors
/// Fails on the first statement that doesn't parse.
pub fn parse_script(script: &str) -> Result<Vec<Statement>> {
    let tokens = Tokenizer::new(script).tokenize()?;

    tokens
        .split(|t| matches!(t, Token::Semicolon | Token::Eof))
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let mut chunk = chunk.to_vec();
            chunk.push(Token::Eof);
            Parser::new(chunk).parse()
        })
        .collect()
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Takes tokens as produced by [Tokenizer::tokenize]; a missing trailing
    /// [Token::Eof] is added.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last() != Some(&Token::Eof) {
            tokens.push(Token::Eof);
        }
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Statement> {
        // semicolon is optionnal in SQL so drop it
        if self.tokens.len() >= 2 && self.tokens[self.tokens.len() - 2] == Token::Semicolon {
            self.tokens.remove(self.tokens.len() - 2);
        }
        if self.is_at_end() {
            return Err(Error::syntax("empty statement"));
        }

        let where_tail = self.peel_where()?;

        let mut statement = match self.current_token() {
            Token::Create => self.parse_create_table(),
            Token::Insert => self.parse_insert(),
            Token::Delete => self.parse_delete(),
            Token::Update => self.parse_update(),
            Token::Select => self.parse_select(),
            other => Err(Error::syntax(format!(
                "unknown statement starting with {other:?} (keywords are case-sensitive)"
            ))),
        }?;

        // Check we are at the end of the statement
        if !self.is_at_end() {
            return Err(Error::syntax(format!(
                "Unexpected token after statement: {:?}",
                self.current_token()
            )));
        }

        let kind = statement.kind();
        if let Some(mut tail) = where_tail {
            let expr = tail.parse_where()?;
            match &mut statement {
                Statement::Select(select) => select.where_clause = Some(expr),
                Statement::Update(update) => update.where_clause = Some(expr),
                Statement::Delete(delete) => delete.where_clause = Some(expr),
                Statement::CreateTable(_) | Statement::Insert(_) => {
                    return Err(Error::syntax(format!("WHERE is not allowed in {kind}")));
                }
            }
        }

        debug!("parsed {kind} statement");
        Ok(statement)
    }

    /// Splits off everything after the first `WHERE` keyword into its own
    /// parser, leaving the statement body in `self`.
    ///
    /// String literals are single tokens, so a `WHERE` inside quotes is never
    /// seen here.
    fn peel_where(&mut self) -> Result<Option<Parser>> {
        let Some(at) = self.tokens.iter().position(|t| *t == Token::Where) else {
            return Ok(None);
        };

        let mut tail = self.tokens.split_off(at);
        self.tokens.push(Token::Eof);
        tail.remove(0); // the WHERE keyword itself

        if matches!(tail.first(), None | Some(Token::Eof)) {
            return Err(Error::syntax("expected an expression after WHERE"));
        }
        Ok(Some(Parser::new(tail)))
    }

    //helpers
    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    fn consume(&mut self, expected: Token) -> Result<()> {
        if *self.current_token() == expected {
            self.advance();
            Ok(())
        } else {
            Err(Error::syntax(format!(
                "Expected {:?}, found {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    /// Consumes a `,` if present.
    fn consume_comma(&mut self) -> bool {
        if matches!(self.current_token(), Token::Comma) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume_ident(&mut self) -> Result<String> {
        match self.current_token() {
            Token::Ident(string) => {
                let string = string.clone(); // Get the name
                self.advance();
                Ok(string)
            }
            _ => Err(Error::syntax(format!(
                "Expected identifier, found {:?}",
                self.current_token()
            ))),
        }
    }

    fn consume_data_type(&mut self) -> Result<DataType> {
        let data_type = match self.current_token() {
            Token::Ident(word) => DataType::from_keyword(word),
            _ => None,
        }
        .ok_or_else(|| {
            Error::syntax(format!(
                "current token {:?} is not a column type (int or str)",
                self.current_token()
            ))
        })?;
        self.advance();
        Ok(data_type)
    }

    fn consume_literal(&mut self) -> Result<Value> {
        let value = match self.current_token() {
            Token::Number(n) => Value::Int(*n),
            Token::String(s) => Value::from(s.as_str()),
            other => {
                return Err(Error::syntax(format!(
                    "Expected literal, found {other:?}"
                )));
            }
        };
        self.advance();
        Ok(value)
    }

    /// `ident (, ident)*`
    fn parse_ident_list(&mut self) -> Result<Vec<String>> {
        let mut names = vec![self.consume_ident()?];
        while self.consume_comma() {
            names.push(self.consume_ident()?);
        }
        Ok(names)
    }

    /// `( item (, item)* )`
    fn parse_parenthesized<T, F>(&mut self, mut item: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        self.consume(Token::LeftParen)?;
        let mut items = vec![item(self)?];
        loop {
            match self.current_token() {
                Token::RightParen => {
                    self.advance();
                    return Ok(items);
                }
                Token::Comma => {
                    self.advance();
                    items.push(item(self)?);
                }
                other => {
                    return Err(Error::syntax(format!("Expected ',' or ')', found {other:?}")));
                }
            }
        }
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef> {
        let name = self.consume_ident()?;

        let data_type = self.consume_data_type()?;

        Ok(ColumnDef { name, data_type })
    }

    /// `CREATE TABLE name (col type, ...)`
    fn parse_create_table(&mut self) -> Result<Statement> {
        self.consume(Token::Create)?; // advance if CREATE
        self.consume(Token::Table)?; // advance if TABLE
        let name = self.consume_ident()?;
        let columns = self.parse_parenthesized(Self::parse_column_def)?;
        let schema = Schema::new(columns)?;
        Ok(Statement::CreateTable(CreateTable { name, schema }))
    }

    /// `INSERT INTO name [(col, ...)] VALUES (lit, ...), (lit, ...), ...`
    fn parse_insert(&mut self) -> Result<Statement> {
        self.consume(Token::Insert)?;
        self.consume(Token::Into)?;
        let table = self.consume_ident()?;

        let columns = if matches!(self.current_token(), Token::LeftParen) {
            Some(self.parse_parenthesized(Self::consume_ident)?)
        } else {
            None
        };

        self.consume(Token::Values)?;
        let mut rows = vec![self.parse_parenthesized(Self::consume_literal)?];
        while self.consume_comma() {
            rows.push(self.parse_parenthesized(Self::consume_literal)?);
        }

        Ok(Statement::Insert(Insert {
            table,
            columns,
            rows,
        }))
    }

    /// `DELETE FROM name`
    fn parse_delete(&mut self) -> Result<Statement> {
        self.consume(Token::Delete)?;
        self.consume(Token::From)?;
        let table = self.consume_ident()?;
        Ok(Statement::Delete(Delete {
            table,
            where_clause: None,
        }))
    }

    /// `UPDATE name SET col = lit, ...`
    fn parse_update(&mut self) -> Result<Statement> {
        self.consume(Token::Update)?;
        let table = self.consume_ident()?;
        self.consume(Token::Set)?;

        let mut assignments = Vec::new();
        loop {
            let column = self.consume_ident()?;
            self.consume(Token::Equal)?;
            let value = self.consume_literal()?;
            assignments.push(Assignment { column, value });
            if !self.consume_comma() {
                break;
            }
        }

        Ok(Statement::Update(Update {
            table,
            assignments,
            where_clause: None,
        }))
    }

    /// `SELECT (* | col, ...) FROM name`
    fn parse_select(&mut self) -> Result<Statement> {
        self.consume(Token::Select)?;

        let columns = if matches!(self.current_token(), Token::Star) {
            self.advance();
            ColumnsSelect::Star
        } else {
            ColumnsSelect::ColumnsNames(self.parse_ident_list()?)
        };

        self.consume(Token::From)?;
        let table = self.consume_ident()?;

        Ok(Statement::Select(Select {
            columns,
            table,
            where_clause: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse(sql: &str) -> Statement {
        parse_statement(sql).unwrap()
    }

    fn syntax_error(sql: &str) {
        match parse_statement(sql) {
            Err(err) => assert_eq!(err.kind(), ErrorKind::Syntax, "{sql}: {err}"),
            Ok(statement) => panic!("{sql} parsed as {statement:?}"),
        }
    }

    #[test]
    fn test_parse_create_table() {
        match parse("CREATE TABLE users (id int, name str)") {
            Statement::CreateTable(ct) => {
                assert_eq!(ct.name, "users");
                assert_eq!(ct.schema.len(), 2);
                assert_eq!(ct.schema.columns()[0].name, "id");
                assert_eq!(ct.schema.columns()[0].data_type, DataType::Int);
                assert_eq!(ct.schema.columns()[1].name, "name");
                assert_eq!(ct.schema.columns()[1].data_type, DataType::Text);
            }
            other => panic!("Expected CreateTable, got {other:?}"),
        }
    }

    #[test]
    fn test_type_names_may_be_column_names() {
        match parse("CREATE TABLE t (int int, str str)") {
            Statement::CreateTable(ct) => {
                assert_eq!(ct.schema.column_names(), vec!["int", "str"]);
            }
            other => panic!("Expected CreateTable, got {other:?}"),
        }
    }

    #[test]
    fn test_create_table_errors() {
        syntax_error("CREATE TABLE t ()");
        syntax_error("CREATE TABLE t (c INT)");
        syntax_error("CREATE TABLE t (c text)");
        syntax_error("CREATE TABLE t (c int");
        syntax_error("CREATE TABLE t (c int,)");
        syntax_error("CREATE TABLE t (c int) extra");
        syntax_error("CREATE t (c int)");
    }

    #[test]
    fn test_create_table_duplicate_column() {
        let err = parse_statement("CREATE TABLE t (c int, c str)").unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn(ref c) if c == "c"));
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        syntax_error("create table t (c int)");
        syntax_error("Select * FROM t");
        syntax_error("SELECT * from t");
        syntax_error("DELETE FROM t where a = 1");
    }

    #[test]
    fn test_parse_insert() {
        let expected = Statement::Insert(Insert {
            table: "t".into(),
            columns: None,
            rows: vec![
                vec![Value::from("a"), Value::Int(1)],
                vec![Value::from("b"), Value::Int(-2)],
            ],
        });
        assert_eq!(parse("INSERT INTO t VALUES ('a', 1), (\"b\", -2)"), expected);
    }

    #[test]
    fn test_parse_insert_with_columns() {
        let expected = Statement::Insert(Insert {
            table: "t".into(),
            columns: Some(vec!["c2".into(), "c1".into()]),
            rows: vec![vec![Value::Int(5), Value::from("b")]],
        });
        assert_eq!(parse("INSERT INTO t (c2,c1) VALUES (5,'b');"), expected);
    }

    #[test]
    fn test_insert_errors() {
        syntax_error("INSERT INTO t VALUES");
        syntax_error("INSERT INTO t VALUES ()");
        syntax_error("INSERT INTO t VALUES (1,)");
        syntax_error("INSERT INTO t VALUES (1) (2)");
        syntax_error("INSERT INTO t VALUES (1),");
        syntax_error("INSERT INTO t () VALUES (1)");
        syntax_error("INSERT INTO t (a VALUES (1)");
        syntax_error("INSERT t VALUES (1)");
        syntax_error("INSERT INTO t VALUES (abc)");
        syntax_error("INSERT INTO t VALUES ('open)");
    }

    #[test]
    fn test_parse_delete() {
        assert_eq!(
            parse("DELETE FROM t"),
            Statement::Delete(Delete {
                table: "t".into(),
                where_clause: None,
            })
        );
        assert_eq!(
            parse("DELETE FROM t WHERE c != 'x'"),
            Statement::Delete(Delete {
                table: "t".into(),
                where_clause: Some(Expr::comparison("c", ComparisonOp::NotEq, "x")),
            })
        );
        syntax_error("DELETE t");
        syntax_error("DELETE FROM t u");
    }

    #[test]
    fn test_parse_update() {
        assert_eq!(
            parse("UPDATE t SET c2 = 7, c1 = 'z' WHERE c1 = 'a'"),
            Statement::Update(Update {
                table: "t".into(),
                assignments: vec![
                    Assignment {
                        column: "c2".into(),
                        value: Value::Int(7),
                    },
                    Assignment {
                        column: "c1".into(),
                        value: Value::from("z"),
                    },
                ],
                where_clause: Some(Expr::comparison("c1", ComparisonOp::Eq, "a")),
            })
        );
        syntax_error("UPDATE t c = 1");
        syntax_error("UPDATE t SET c 1");
        syntax_error("UPDATE t SET c = 1,");
        syntax_error("UPDATE t SET c = d");
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(
            parse("SELECT * FROM t"),
            Statement::Select(Select {
                columns: ColumnsSelect::Star,
                table: "t".into(),
                where_clause: None,
            })
        );
        assert_eq!(
            parse("SELECT c2, c1 FROM t WHERE c2 >= 2;"),
            Statement::Select(Select {
                columns: ColumnsSelect::ColumnsNames(vec!["c2".into(), "c1".into()]),
                table: "t".into(),
                where_clause: Some(Expr::comparison("c2", ComparisonOp::GtEq, 2_i64)),
            })
        );
        syntax_error("SELECT FROM t");
        syntax_error("SELECT * t");
        syntax_error("SELECT *, c FROM t");
        syntax_error("SELECT c, FROM t");
        syntax_error("SELECT * FROM t u");
    }

    #[test]
    fn test_where_inside_quotes_is_not_peeled() {
        assert_eq!(
            parse("INSERT INTO t VALUES ('a WHERE b = 1')"),
            Statement::Insert(Insert {
                table: "t".into(),
                columns: None,
                rows: vec![vec![Value::from("a WHERE b = 1")]],
            })
        );
    }

    #[test]
    fn test_where_rejected_on_create_and_insert() {
        syntax_error("CREATE TABLE t (c int) WHERE c = 1");
        syntax_error("INSERT INTO t VALUES (1) WHERE c = 1");
    }

    #[test]
    fn test_empty_and_dangling_input() {
        syntax_error("");
        syntax_error("   ");
        syntax_error(";");
        syntax_error("SELECT * FROM t WHERE");
        syntax_error("SELECT * FROM t;;");
        syntax_error("SELECT * FROM t; SELECT * FROM u");
    }

    #[test]
    fn test_parser_without_eof_token() {
        let err = Parser::new(vec![]).parse().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);

        let tokens = vec![
            Token::Delete,
            Token::From,
            Token::Ident("t".to_string()),
        ];
        let statement = Parser::new(tokens).parse().unwrap();
        assert_eq!(
            statement,
            Statement::Delete(Delete {
                table: "t".to_string(),
                where_clause: None,
            })
        );
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let sql = "SELECT a, b FROM t WHERE (a = 1 OR b = 'x') AND a < 10";
        assert_eq!(parse(sql), parse(sql));
    }

    #[test]
    fn test_parse_script() {
        let statements = parse_script(
            "CREATE TABLE t (c1 str, c2 int);\n\
             INSERT INTO t VALUES ('a;b', 1);;\n\
             SELECT * FROM t WHERE c2 >= 2",
        )
        .unwrap();

        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].kind(), "CREATE TABLE");
        assert_eq!(
            statements[1],
            Statement::Insert(Insert {
                table: "t".into(),
                columns: None,
                rows: vec![vec![Value::from("a;b"), Value::Int(1)]],
            })
        );
        assert_eq!(statements[2].kind(), "SELECT");

        assert!(parse_script("   ").unwrap().is_empty());
        assert!(parse_script("SELECT * FROM t; select * FROM t").is_err());
    }
}
