//! Hinge Lexer
//!
//! Tokenizes template source into a stream of tokens.
//! Text outside of tags is passed through as `Data`; inside `{% ... %}` the
//! scanner produces names, literals and symbols for the tag parsers.
//! `{# ... #}` comments are dropped here and never reach the parser.
//!
//! # Example
//!
//! ```
//! use hinge_lexer::{Scanner, TokenKind};
//!
//! let tokens = Scanner::tokenize("{% lorem 2 %}").unwrap();
//! assert_eq!(tokens[1].kind, TokenKind::Name);
//! assert_eq!(tokens[1].value, "lorem");
//! ```

pub mod config;
pub mod scanner;
pub mod token;

pub use config::{ConfigError, LexerConfig};
pub use scanner::Scanner;
pub use token::{Position, Span, Token, TokenKind};

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at line {line}, column {column}: {message}")]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}
