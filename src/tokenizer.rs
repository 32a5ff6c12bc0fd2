use crate::error::{Error, Result};

/// Represents the smallest meaningful units (atoms) of the SQL language.
///
/// Keywords are recognized only in upper case; `select` or `Select` come out
/// as plain identifiers and are rejected later by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- SQL Keywords ---
    Create,
    Table,
    Insert,
    Into,
    Values,
    Delete,
    Update,
    Set,
    Select,
    From,
    Where,
    And,
    Or,

    // --- Identifiers & Literals ---
    /// A name representing a table or a column (e.g., `users`, `id`).
    /// Column type names (`int`, `str`) are identifiers too.
    Ident(String),
    /// A 64-bit integer literal, with its optional sign (e.g., `42`, `-7`).
    Number(i64),
    /// A string literal between matching single or double quotes.
    String(String),

    // --- Symbols ---
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Comma `,`
    Comma,
    /// Semicolon `;`
    Semicolon,
    /// Wildcard symbol `*`
    Star,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Lower,
    /// `>`
    Greater,
    /// `<=`
    LowerEqual,
    /// `>=`
    GreaterEqual,

    // --- Special ---
    /// Represents the End Of File/Input.
    Eof,
}

/// A lexical scanner (lexer) that converts a raw SQL string into a sequence of [Token]s.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy iteration.
    input: Vec<char>,
    /// The current position in the character vector.
    position: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Processes the entire input and returns a vector of tokens ending with
    /// [Token::Eof].
    ///
    /// # Errors
    /// Returns a syntax error if an invalid character is encountered or if a
    /// literal is malformed (unterminated string, integer out of range).
    ///
    /// # Example
    /// ```
    /// # use memdb::tokenizer::{Tokenizer, Token};
    /// let mut t = Tokenizer::new("SELECT *");
    /// let tokens = t.tokenize().unwrap();
    /// assert_eq!(tokens[0], Token::Select);
    /// ```
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            let token = self.next_token()?;
            tokens.push(token);
        }

        tokens.push(Token::Eof);
        log::trace!("tokens: {tokens:?}");
        Ok(tokens)
    }

    /// Identifies the next token based on the character at the current position.
    fn next_token(&mut self) -> Result<Token> {
        let ch = self.current_char();

        match ch {
            '(' => {
                self.advance();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RightParen)
            }
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            ';' => {
                self.advance();
                Ok(Token::Semicolon)
            }
            '*' => {
                self.advance();
                Ok(Token::Star)
            }
            '=' => {
                self.advance();
                Ok(Token::Equal)
            }
            '!' => {
                self.advance();
                if self.next_is('=') {
                    Ok(Token::NotEqual)
                } else {
                    Err(Error::syntax("expected '=' after '!'"))
                }
            }
            '<' => {
                self.advance();
                Ok(if self.next_is('=') {
                    Token::LowerEqual
                } else {
                    Token::Lower
                })
            }
            '>' => {
                self.advance();
                Ok(if self.next_is('=') {
                    Token::GreaterEqual
                } else {
                    Token::Greater
                })
            }
            c if c.is_ascii_alphabetic() || c == '_' => Ok(self.read_identifier()),
            c if c.is_ascii_digit() => self.read_number(),
            '+' | '-' if self.peek_char().is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()
            }
            '\'' | '"' => self.read_string(ch),
            _ => Err(Error::syntax(format!("character {ch:?} is not supported"))),
        }
    }

    // --- Navigation Helpers ---

    /// Returns the character at the current position.
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Moves the cursor forward by one character.
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Consumes `expected` if it is the current character.
    fn next_is(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Checks if the cursor has reached the end of the input.
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Consumes any whitespace characters (spaces, tabs, newlines).
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    // --- Extraction Logic ---

    /// Reads the longest run of identifier characters and determines if it's
    /// a reserved SQL keyword or a user-defined identifier.
    ///
    /// Keywords are matched case-sensitively, and because the whole run is read
    /// first, `ORDERS` or `AND_x` are identifiers rather than `OR`/`AND`
    /// followed by something else.
    fn read_identifier(&mut self) -> Token {
        let mut ident = String::new();

        while !self.is_at_end()
            && (self.current_char().is_ascii_alphanumeric() || self.current_char() == '_')
        {
            ident.push(self.current_char());
            self.advance();
        }

        match ident.as_str() {
            "CREATE" => Token::Create,
            "TABLE" => Token::Table,
            "INSERT" => Token::Insert,
            "INTO" => Token::Into,
            "VALUES" => Token::Values,
            "DELETE" => Token::Delete,
            "UPDATE" => Token::Update,
            "SET" => Token::Set,
            "SELECT" => Token::Select,
            "FROM" => Token::From,
            "WHERE" => Token::Where,
            "AND" => Token::And,
            "OR" => Token::Or,
            _ => Token::Ident(ident),
        }
    }

    /// Reads an integer literal with an optional leading sign.
    fn read_number(&mut self) -> Result<Token> {
        let mut number = String::new();

        if matches!(self.current_char(), '+' | '-') {
            number.push(self.current_char());
            self.advance();
        }
        while !self.is_at_end() && self.current_char().is_ascii_digit() {
            number.push(self.current_char());
            self.advance();
        }

        number
            .parse::<i64>()
            .map(Token::Number)
            .map_err(|e| Error::syntax(format!("invalid integer literal {number}: {e}")))
    }

    /// Reads a string literal enclosed in `quote`.
    ///
    /// There is no escape mechanism: the literal ends at the next `quote`, so
    /// it can never contain its own quote character.
    fn read_string(&mut self, quote: char) -> Result<Token> {
        self.advance(); // Skip the opening quote

        let mut string = String::new();
        while !self.is_at_end() && self.current_char() != quote {
            string.push(self.current_char());
            self.advance();
        }

        if self.is_at_end() {
            return Err(Error::syntax("unterminated string literal"));
        }

        // Skip the closing quote
        self.advance();

        Ok(Token::String(string))
    }
}
