//! Tag name → parser function table.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::nodes::Statement;
use crate::parser::Parser;
use crate::{statements, ParseError};

/// A tag parser.
///
/// Receives the outer parser, whose current token is the tag name, and a
/// sub-parser bounded to the tag's arguments. Block tags may advance the
/// outer parser past their body; inline tags leave it alone.
pub type StatementParser =
    fn(&mut Parser<'_>, &mut Parser<'_>) -> Result<Box<dyn Statement>, ParseError>;

/// Registry error, raised while tags are being registered at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("Statement '{name}' is already registered")]
    DuplicateRegistration { name: String },
}

/// Maps tag names to their parser functions.
///
/// Built once before any template is compiled and then only read, so a
/// single registry can be shared by compilations on many threads.
#[derive(Clone, Default)]
pub struct StatementRegistry {
    parsers: HashMap<String, StatementParser>,
}

impl StatementRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in statements.
    pub fn builtin() -> Self {
        let parsers: HashMap<String, StatementParser> = statements::BUILTINS
            .iter()
            .map(|(name, parser)| (name.to_string(), *parser))
            .collect();

        debug!(tags = parsers.len(), "registered built-in statements");
        Self { parsers }
    }

    /// Bind `name` to `parser`. An existing binding is kept and reported.
    pub fn register(&mut self, name: &str, parser: StatementParser) -> Result<(), RegistryError> {
        if self.parsers.contains_key(name) {
            return Err(RegistryError::DuplicateRegistration {
                name: name.to_string(),
            });
        }

        debug!(tag = name, "registered statement");
        self.parsers.insert(name.to_string(), parser);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<StatementParser> {
        self.parsers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    /// Registered tag names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for StatementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementRegistry")
            .field("tags", &self.names())
            .finish()
    }
}
