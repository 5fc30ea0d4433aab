//! Hinge Parser
//!
//! Compiles a token stream into a [`Template`] of executable nodes.
//! Text between tags becomes data nodes; every `{% name ... %}` tag is
//! looked up in a [`StatementRegistry`] and handed to the registered
//! parser function together with a sub-parser bounded to the tag's
//! arguments. New tags plug in by registering a function; the parser
//! itself knows no tag names.
//!
//! ```
//! use hinge_exec::Renderer;
//! use hinge_parser::{Parser, StatementRegistry};
//!
//! let registry = StatementRegistry::builtin();
//! let template = Parser::parse("A{% comment %}hidden{% endcomment %}B", &registry).unwrap();
//!
//! let mut renderer = Renderer::with_seed(0);
//! template.execute(&mut renderer).unwrap();
//! assert_eq!(renderer.output(), "AB");
//! ```

pub mod nodes;
pub mod parser;
pub mod registry;
pub mod statements;

pub use hinge_lexer::Position;
pub use nodes::{Data, Node, Statement, Template};
pub use parser::Parser;
pub use registry::{RegistryError, StatementParser, StatementRegistry};

/// What went wrong while compiling a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source could not be tokenized.
    Lexer,
    /// A token appeared where the grammar does not allow it.
    UnexpectedToken,
    /// A tag name has no registered parser.
    UnknownTag,
    /// A tag's arguments violate that tag's grammar.
    MalformedArguments,
    /// A block tag's end marker never appeared.
    UnterminatedBlock,
}

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
    #[source]
    pub cause: Option<Box<ParseError>>,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            line: position.line,
            column: position.column,
            cause: None,
        }
    }

    /// Attach the error that led to this one.
    pub fn caused_by(mut self, cause: ParseError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

impl From<hinge_lexer::LexerError> for ParseError {
    fn from(e: hinge_lexer::LexerError) -> Self {
        ParseError {
            kind: ErrorKind::Lexer,
            message: e.message,
            line: e.line,
            column: e.column,
            cause: None,
        }
    }
}
