use crate::config::LexerConfig;
use crate::token::{is_symbol_char, Span, Token, TokenKind, SYMBOLS};
use crate::LexerError;

/// Scanner mode determines whether text is copied through or tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerMode {
    /// Outside of tags: everything up to the next delimiter is `Data`.
    Data,
    /// Between `{%` and `%}`: names, literals and symbols.
    Tag,
}

/// Template source scanner.
///
/// Tokenizes template source into a flat stream of tokens that always ends
/// with `Eof`. Handles data passthrough, block delimiters, template
/// comments, string literals with escapes, and numbers.
///
/// - `Vec<char>` source for index-based navigation
/// - Mode-aware delimiter handling
/// - Position tracking on every token
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    mode: ScannerMode,
    block_start: Vec<char>,
    block_end: Vec<char>,
    comment_start: Vec<char>,
    comment_end: Vec<char>,
    /// Line and column of the `{%` that opened the current tag.
    tag_start: (usize, usize),
}

impl Scanner {
    /// Create a new scanner for the given source.
    pub fn new(source: &str, config: &LexerConfig) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            mode: ScannerMode::Data,
            block_start: config.block_start.chars().collect(),
            block_end: config.block_end.chars().collect(),
            comment_start: config.comment_start.chars().collect(),
            comment_end: config.comment_end.chars().collect(),
            tag_start: (1, 1),
        }
    }

    /// Tokenize the entire source with the default `{% %}` / `{# #}` delimiters.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
        Self::tokenize_with(source, &LexerConfig::default())
    }

    /// Tokenize the entire source with custom delimiters.
    pub fn tokenize_with(source: &str, config: &LexerConfig) -> Result<Vec<Token>, LexerError> {
        config.validate().map_err(|e| LexerError {
            message: format!("Invalid lexer configuration: {e}"),
            line: 1,
            column: 1,
        })?;

        let mut scanner = Scanner::new(source, config);
        scanner.scan_tokens()?;
        Ok(scanner.tokens)
    }

    /// Scan all tokens from the source.
    fn scan_tokens(&mut self) -> Result<(), LexerError> {
        while !self.is_at_end() {
            match self.mode {
                ScannerMode::Data => self.scan_data()?,
                ScannerMode::Tag => self.scan_tag_token()?,
            }
        }

        if self.mode == ScannerMode::Tag {
            let (line, column) = self.tag_start;
            return Err(LexerError {
                message: "Unclosed tag: missing block end delimiter".into(),
                line,
                column,
            });
        }

        self.emit(TokenKind::Eof, "");
        Ok(())
    }

    // --- Data mode ---

    /// Copy text through until the next block or comment delimiter.
    fn scan_data(&mut self) -> Result<(), LexerError> {
        let start_line = self.line;
        let start_col = self.column;
        let start_pos = self.pos;

        let mut text = String::new();
        while !self.is_at_end()
            && !self.starts_with(&self.block_start)
            && !self.starts_with(&self.comment_start)
        {
            text.push(self.peek());
            self.advance();
        }

        if !text.is_empty() {
            let span = Span::new(start_pos, self.pos, start_line, start_col);
            self.tokens.push(Token::new(TokenKind::Data, text, span));
        }

        if self.starts_with(&self.block_start) {
            self.tag_start = (self.line, self.column);
            let value: String = self.block_start.iter().collect();
            self.emit(TokenKind::BlockBegin, value);
            self.skip(self.block_start.len());
            self.mode = ScannerMode::Tag;
        } else if self.starts_with(&self.comment_start) {
            self.skip_comment()?;
        }

        Ok(())
    }

    /// Drop a `{# ... #}` comment, including any newlines inside it.
    fn skip_comment(&mut self) -> Result<(), LexerError> {
        let start_line = self.line;
        let start_col = self.column;
        self.skip(self.comment_start.len());

        while !self.is_at_end() {
            if self.starts_with(&self.comment_end) {
                self.skip(self.comment_end.len());
                return Ok(());
            }
            self.advance();
        }

        Err(LexerError {
            message: "Unterminated comment".into(),
            line: start_line,
            column: start_col,
        })
    }

    // --- Tag mode ---

    /// Scan the next token inside a tag.
    fn scan_tag_token(&mut self) -> Result<(), LexerError> {
        if self.starts_with(&self.block_end) {
            let value: String = self.block_end.iter().collect();
            self.emit(TokenKind::BlockEnd, value);
            self.skip(self.block_end.len());
            self.mode = ScannerMode::Data;
            return Ok(());
        }

        let ch = self.peek();

        match ch {
            c if c.is_whitespace() => {
                self.advance();
                Ok(())
            }

            '"' | '\'' => self.scan_string(),

            '0'..='9' => self.scan_number(),

            c if c.is_alphabetic() || c == '_' => self.scan_name(),

            c if is_symbol_char(c) => self.scan_symbol(),

            _ => self.scan_unknown(),
        }
    }

    /// Scan a string literal, resolving escape sequences.
    fn scan_string(&mut self) -> Result<(), LexerError> {
        let quote = self.peek();
        let start_line = self.line;
        let start_col = self.column;
        let start_pos = self.pos;
        self.advance(); // consume opening quote

        let mut value = String::new();

        while !self.is_at_end() && self.peek() != quote {
            if self.peek() == '\\' {
                self.advance(); // consume backslash
                if self.is_at_end() {
                    return Err(LexerError {
                        message: "Unterminated escape sequence".into(),
                        line: self.line,
                        column: self.column,
                    });
                }
                match self.peek() {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '\\' => value.push('\\'),
                    c if c == quote => value.push(c),
                    c => {
                        value.push('\\');
                        value.push(c);
                    }
                }
                self.advance();
            } else {
                value.push(self.peek());
                self.advance();
            }
        }

        if self.is_at_end() {
            return Err(LexerError {
                message: "Unterminated string".into(),
                line: start_line,
                column: start_col,
            });
        }

        self.advance(); // consume closing quote

        let span = Span::new(start_pos, self.pos, start_line, start_col);
        self.tokens.push(Token::new(TokenKind::String, value, span));
        Ok(())
    }

    /// Scan a bare name.
    fn scan_name(&mut self) -> Result<(), LexerError> {
        let start_line = self.line;
        let start_col = self.column;
        let start_pos = self.pos;

        let mut name = String::new();
        while !self.is_at_end() && (self.peek().is_alphanumeric() || self.peek() == '_') {
            name.push(self.peek());
            self.advance();
        }

        let span = Span::new(start_pos, self.pos, start_line, start_col);
        self.tokens.push(Token::new(TokenKind::Name, name, span));
        Ok(())
    }

    /// Scan a number literal. A `.` only continues the number when a digit
    /// follows it, so `1..3` stays an integer, a range symbol and an integer.
    fn scan_number(&mut self) -> Result<(), LexerError> {
        let start_line = self.line;
        let start_col = self.column;
        let start_pos = self.pos;

        let mut text = String::new();
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            text.push(self.peek());
            self.advance();
        }

        let mut kind = TokenKind::Integer;
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            kind = TokenKind::Float;
            text.push('.');
            self.advance();
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                text.push(self.peek());
                self.advance();
            }
        }

        let span = Span::new(start_pos, self.pos, start_line, start_col);
        self.tokens.push(Token::new(kind, text, span));
        Ok(())
    }

    /// Scan an operator or punctuation symbol, longest match first.
    fn scan_symbol(&mut self) -> Result<(), LexerError> {
        let start_line = self.line;
        let start_col = self.column;
        let start_pos = self.pos;

        let symbol = SYMBOLS
            .iter()
            .find(|s| {
                let chars: Vec<char> = s.chars().collect();
                self.starts_with(&chars)
            })
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.peek().to_string());

        self.skip(symbol.chars().count());

        let span = Span::new(start_pos, self.pos, start_line, start_col);
        self.tokens.push(Token::new(TokenKind::Symbol, symbol, span));
        Ok(())
    }

    /// Keep an unrecognized character as an `Unknown` token. The parser
    /// rejects it in tags it parses; skipped block bodies never look at it.
    fn scan_unknown(&mut self) -> Result<(), LexerError> {
        let start_line = self.line;
        let start_col = self.column;
        let start_pos = self.pos;

        let ch = self.peek();
        self.advance();

        let span = Span::new(start_pos, self.pos, start_line, start_col);
        self.tokens.push(Token::new(TokenKind::Unknown, ch, span));
        Ok(())
    }

    // --- Helpers ---

    fn emit(&mut self, kind: TokenKind, value: impl Into<String>) {
        let span = Span::new(self.pos, self.pos, self.line, self.column);
        self.tokens.push(Token::new(kind, value, span));
    }

    fn starts_with(&self, delimiter: &[char]) -> bool {
        self.chars
            .get(self.pos..self.pos + delimiter.len())
            .is_some_and(|window| window == delimiter)
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.pos]
        }
    }

    fn peek_next(&self) -> char {
        if self.pos + 1 >= self.chars.len() {
            '\0'
        } else {
            self.chars[self.pos + 1]
        }
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            if self.chars[self.pos] == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn skip(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

}
