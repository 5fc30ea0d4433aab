//! Hinge Exec
//!
//! Runtime support for executing compiled templates: the [`Renderer`]
//! output sink that statements write through, and the text generators
//! those statements call into.
//!
//! ```text
//! Template AST → execute(&mut Renderer) → Renderer::output()
//! ```

pub mod lorem;
pub mod renderer;

pub use lorem::LoremMode;
pub use renderer::Renderer;

/// Error raised while executing a template.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// A text generator was asked for a mode it does not know.
    #[error("Unknown lorem mode '{mode}': expected 'w', 'p' or 'b'")]
    UnknownMode { mode: String },

    /// More output was requested than a single generator call allows.
    #[error("Lorem count {count} exceeds the maximum of {max}")]
    CountTooLarge { count: usize, max: usize },

    /// A statement failed while writing its output.
    #[error("Render error at line {line}, column {column}: {message}")]
    Statement {
        message: String,
        line: usize,
        column: usize,
    },
}
