//! Compiled template nodes.
//!
//! A [`Template`] owns its nodes top-down; nodes never point back at their
//! parent. Nodes are immutable once parsed, so one compiled template can be
//! executed by many renderers at the same time.

use std::any::Any;
use std::fmt;

use hinge_exec::{RenderError, Renderer};
use hinge_lexer::Position;

/// A node produced from a tag.
pub trait Statement: fmt::Debug + Send + Sync {
    /// Where the tag name appeared in the source.
    fn position(&self) -> Position;

    /// Short identity used in diagnostics and traces.
    fn describe(&self) -> String;

    /// Write this statement's output.
    fn execute(&self, renderer: &mut Renderer) -> Result<(), RenderError>;

    fn as_any(&self) -> &dyn Any;
}

impl dyn Statement {
    /// Access the concrete statement type.
    pub fn downcast_ref<T: Statement + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Raw text between tags, written out unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    pub position: Position,
    pub text: String,
}

/// A node in a compiled template.
#[derive(Debug)]
pub enum Node {
    Data(Data),
    Statement(Box<dyn Statement>),
}

impl Node {
    pub fn position(&self) -> Position {
        match self {
            Node::Data(data) => data.position,
            Node::Statement(statement) => statement.position(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Node::Data(data) => format!(
                "Data(Line={} Col={} Len={})",
                data.position.line,
                data.position.column,
                data.text.chars().count()
            ),
            Node::Statement(statement) => statement.describe(),
        }
    }

    pub fn execute(&self, renderer: &mut Renderer) -> Result<(), RenderError> {
        match self {
            Node::Data(data) => {
                renderer.write_str(&data.text);
                Ok(())
            }
            Node::Statement(statement) => statement.execute(renderer),
        }
    }
}

/// A compiled template.
#[derive(Debug, Default)]
pub struct Template {
    pub nodes: Vec<Node>,
}

impl Template {
    /// Execute every node in order. The first failing node stops rendering.
    pub fn execute(&self, renderer: &mut Renderer) -> Result<(), RenderError> {
        for node in &self.nodes {
            node.execute(renderer)?;
        }
        Ok(())
    }
}
