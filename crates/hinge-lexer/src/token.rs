use std::fmt;

/// A line/column location in template source, used by nodes and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A range in source text, tracking line and column for error reporting.
///
/// `start` and `end` are character offsets; `line` and `column` are 1-based
/// and point at the first character of the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Token classification for template source.
///
/// The kind is matched on by tag parsers; the token text lives in
/// [`Token::value`] so a parser can ask for "any integer" without caring
/// about its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Raw template text between tags.
    Data,

    /// `{%`
    BlockBegin,
    /// `%}`
    BlockEnd,

    // Literals
    Integer,
    Float,
    String,

    /// A bare name: tag names, keywords and identifiers.
    Name,

    /// Operators and punctuation (`==`, `(`, `,`, `|`, ...).
    Symbol,

    /// A character inside a tag that starts no other token.
    Unknown,

    /// End of input
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Data => "data",
            TokenKind::BlockBegin => "block begin",
            TokenKind::BlockEnd => "block end",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::String => "string",
            TokenKind::Name => "name",
            TokenKind::Symbol => "symbol",
            TokenKind::Unknown => "unknown character",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// A token produced by the template lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw text of the token. For strings this is the unescaped content.
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    pub fn position(&self) -> Position {
        self.span.position()
    }

    /// True if this is a bare name spelled exactly `name`.
    pub fn is_name(&self, name: &str) -> bool {
        self.kind == TokenKind::Name && self.value == name
    }
}

/// Multi-character symbols, longest first so `**` wins over `*`.
pub const SYMBOLS: &[&str] = &["==", "!=", "<=", ">=", "//", "**", ".."];

/// Single characters recognized as symbols inside a tag.
pub const SINGLE_SYMBOLS: &[char] = &[
    '+', '-', '*', '/', '%', '=', '<', '>', '!', '(', ')', '[', ']', '{', '}', ',', '.', ':',
    '|', '~', '?',
];

/// Check if a character can start a single-character symbol.
pub fn is_symbol_char(c: char) -> bool {
    SINGLE_SYMBOLS.contains(&c)
}
