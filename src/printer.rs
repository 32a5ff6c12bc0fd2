use std::io::Write;

use crate::error::{Error, Result};
use crate::executor::{Outcome, QueryResult};
use crate::value::Value;

/// Renders statement outcomes as text tables, psql style.
///
/// Results go to `out`, errors to `err`.
pub struct Printer<W, E> {
    out: W,
    err: E,
}

impl<W: Write, E: Write> Printer<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self { out, err }
    }

    pub fn print_outcome(&mut self, outcome: &Outcome) -> Result<()> {
        match outcome {
            Outcome::TableCreated(name) => self.print_created(name),
            Outcome::Affected(count) => self.print_affected(*count),
            Outcome::Rows(result) => self.print_query_result(result),
        }
    }

    /// Prints the header, a separator, one line per row and a `(N rows)`
    /// footer.
    ///
    /// Each column is as wide as its widest cell or header. Columns holding
    /// integers are right-aligned, text columns left-aligned.
    pub fn print_query_result(&mut self, result: &QueryResult) -> Result<()> {
        let columns = result.columns.len();
        if columns == 0 {
            writeln!(self.out)?;
        } else {
            let mut widths: Vec<usize> = result.columns.iter().map(|h| h.chars().count()).collect();
            let mut numeric = vec![false; columns];
            let cells: Vec<Vec<String>> = result
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .take(columns)
                        .enumerate()
                        .map(|(i, value)| {
                            if matches!(value, Value::Int(_)) {
                                numeric[i] = true;
                            }
                            let text = value.to_string();
                            widths[i] = widths[i].max(text.chars().count());
                            text
                        })
                        .collect()
                })
                .collect();

            let header: Vec<String> = result
                .columns
                .iter()
                .zip(&widths)
                .map(|(h, &w)| format!("{h:<w$}"))
                .collect();
            writeln!(self.out, "{}", header.join(" | "))?;

            let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
            writeln!(self.out, "{}", separator.join("-+-"))?;

            for row in &cells {
                let line: Vec<String> = row
                    .iter()
                    .enumerate()
                    .map(|(i, text)| {
                        let w = widths[i];
                        if numeric[i] {
                            format!("{text:>w$}")
                        } else {
                            format!("{text:<w$}")
                        }
                    })
                    .collect();
                writeln!(self.out, "{}", line.join(" | "))?;
            }
        }

        let count = result.rows.len();
        let noun = if count == 1 { "row" } else { "rows" };
        writeln!(self.out, "({count} {noun})")?;
        Ok(())
    }

    pub fn print_affected(&mut self, count: usize) -> Result<()> {
        writeln!(self.out, "({count} rows affected)")?;
        Ok(())
    }

    pub fn print_created(&mut self, table: &str) -> Result<()> {
        writeln!(self.out, "(table {table} created)")?;
        Ok(())
    }

    pub fn print_error(&mut self, error: &Error) -> Result<()> {
        writeln!(self.err, "Error: {error}")?;
        Ok(())
    }

    pub fn print_help(&mut self, program: &str) -> Result<()> {
        write!(
            self.out,
            "{program}: in-memory SQL (subset)\n\
             Type SQL statements and terminate each with ';'.\n\
             SELECT results are printed to stdout; errors go to stderr.\n\
             Examples:\n  \
             CREATE TABLE t (c1 str, c2 int);\n  \
             INSERT INTO t VALUES ('a', 1), ('b', 2);\n  \
             SELECT * FROM t WHERE c2 >= 2;\n\
             Ctrl-D to end input.\n"
        )?;
        Ok(())
    }

    /// Writes the shell prompt and flushes so it shows before input is typed.
    pub fn print_prompt(&mut self, prompt: &str) -> Result<()> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        self.err.flush()?;
        Ok(())
    }
}
