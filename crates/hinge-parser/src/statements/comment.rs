//! `{% comment %} ... {% endcomment %}`
//!
//! The body is dropped while parsing; nothing of it reaches the template.

use std::any::Any;

use hinge_exec::{RenderError, Renderer};
use hinge_lexer::Position;

use crate::nodes::Statement;
use crate::parser::Parser;
use crate::registry::{RegistryError, StatementRegistry};
use crate::{ErrorKind, ParseError};

pub const TAG: &str = "comment";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStatement {
    pub position: Position,
}

impl Statement for CommentStatement {
    fn position(&self) -> Position {
        self.position
    }

    fn describe(&self) -> String {
        format!(
            "CommentStmt(Line={} Col={})",
            self.position.line, self.position.column
        )
    }

    fn execute(&self, _renderer: &mut Renderer) -> Result<(), RenderError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn parse(
    parser: &mut Parser<'_>,
    args: &mut Parser<'_>,
) -> Result<Box<dyn Statement>, ParseError> {
    let statement = CommentStatement {
        position: parser.current().position(),
    };

    parser.skip_until("endcomment").map_err(|cause| {
        if cause.kind != ErrorKind::UnterminatedBlock {
            return cause;
        }
        ParseError::new(
            ErrorKind::UnterminatedBlock,
            "Tag 'comment' is never closed by 'endcomment'.",
            statement.position,
        )
        .caused_by(cause)
    })?;

    if !args.at_end() {
        return Err(args.error(
            ErrorKind::MalformedArguments,
            "Tag 'comment' does not take any argument.",
        ));
    }

    Ok(Box::new(statement))
}

pub fn register(registry: &mut StatementRegistry) -> Result<(), RegistryError> {
    registry.register(TAG, parse)
}
