//! Splits a stream of SQL text into statements.
//!
//! Input is consumed line by line. `-- line` and `/* block */` comments are
//! dropped and `;` ends a statement, except inside `'...'` or `"..."`
//! literals where both are plain text.

use std::collections::VecDeque;
use std::io::BufRead;

use log::trace;

use crate::error::Result;

pub struct StatementReader<R> {
    input: R,
    interactive: bool,
    /// Text of the statement being assembled, comments already removed.
    pending: String,
    /// Complete statements from the last line that haven't been handed out.
    ready: VecDeque<String>,
    quote: Option<char>,
    in_block_comment: bool,
    eof: bool,
}

impl<R: BufRead> StatementReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            interactive: false,
            pending: String::new(),
            ready: VecDeque::new(),
            quote: None,
            in_block_comment: false,
            eof: false,
        }
    }

    /// Marks the input as typed by a user, so the shell shows a prompt.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// True when the next call to [StatementReader::next_statement] starts a
    /// fresh statement, i.e. nothing is buffered.
    pub fn at_statement_start(&self) -> bool {
        self.ready.is_empty() && self.pending.trim().is_empty()
    }

    /// Returns the next non-empty statement without its terminating `;`.
    ///
    /// At end of input a trailing statement without `;` is returned, then
    /// `None`.
    ///
    /// # Errors
    /// Returns [crate::Error::Io] if reading fails.
    pub fn next_statement(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(statement) = self.ready.pop_front() {
                trace!("statement: {statement}");
                return Ok(Some(statement));
            }
            if self.eof {
                let rest = std::mem::take(&mut self.pending);
                let rest = rest.trim();
                return Ok((!rest.is_empty()).then(|| rest.to_string()));
            }

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                self.eof = true;
            } else {
                self.scan_line(&line);
            }
        }
    }

    fn scan_line(&mut self, line: &str) {
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if self.in_block_comment {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    self.in_block_comment = false;
                }
                continue;
            }

            if let Some(quote) = self.quote {
                if c == quote {
                    self.quote = None;
                }
                self.pending.push(c);
                continue;
            }

            match c {
                '-' if chars.peek() == Some(&'-') => {
                    // Rest of the line is a comment; keep the line break.
                    self.pending.push('\n');
                    return;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    self.in_block_comment = true;
                    self.pending.push(' ');
                }
                '\'' | '"' => {
                    self.quote = Some(c);
                    self.pending.push(c);
                }
                ';' => self.finish_statement(),
                _ => self.pending.push(c),
            }
        }
    }

    fn finish_statement(&mut self) {
        let statement = std::mem::take(&mut self.pending);
        let statement = statement.trim();
        if !statement.is_empty() {
            self.ready.push_back(statement.to_string());
        }
    }
}

impl<R: BufRead> Iterator for StatementReader<R> {
    type Item = Result<String>;

    /// Stops after the first I/O error.
    fn next(&mut self) -> Option<Self::Item> {
        match self.next_statement() {
            Ok(statement) => statement.map(Ok),
            Err(e) => {
                self.eof = true;
                self.ready.clear();
                self.pending.clear();
                Some(Err(e))
            }
        }
    }
}
