//! Built-in statements.
//!
//! Each statement module pairs a node type with the parser function it
//! registers under its tag name.

pub mod comment;
pub mod lorem;

pub use comment::CommentStatement;
pub use lorem::LoremStatement;

use crate::registry::{RegistryError, StatementParser, StatementRegistry};

/// Built-in tag names and their parser functions.
pub const BUILTINS: &[(&str, StatementParser)] = &[
    (comment::TAG, comment::parse),
    (lorem::TAG, lorem::parse),
];

/// Register every built-in statement.
pub fn register_builtins(registry: &mut StatementRegistry) -> Result<(), RegistryError> {
    for (name, parser) in BUILTINS {
        registry.register(name, *parser)?;
    }
    Ok(())
}
