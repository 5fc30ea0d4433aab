//! `{% lorem [count] [w|p|b] [random] %}`

use std::any::Any;

use hinge_exec::lorem::{self, LoremMode};
use hinge_exec::{RenderError, Renderer};
use hinge_lexer::{Position, TokenKind};

use crate::nodes::Statement;
use crate::parser::Parser;
use crate::registry::{RegistryError, StatementRegistry};
use crate::{ErrorKind, ParseError};

pub const TAG: &str = "lorem";

/// Placeholder text generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoremStatement {
    pub position: Position,
    /// Number of words or paragraphs.
    pub count: usize,
    pub mode: LoremMode,
    /// Sample from the corpus instead of reading it in order.
    pub random: bool,
}

impl Statement for LoremStatement {
    fn position(&self) -> Position {
        self.position
    }

    fn describe(&self) -> String {
        format!(
            "LoremStmt(Line={} Col={})",
            self.position.line, self.position.column
        )
    }

    fn execute(&self, renderer: &mut Renderer) -> Result<(), RenderError> {
        let text = lorem::generate(self.count, self.mode, self.random, renderer.rng())
            .map_err(|e| RenderError::Statement {
                message: e.to_string(),
                line: self.position.line,
                column: self.position.column,
            })?;
        renderer.write_str(&text);
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
    let mut statement = LoremStatement {
        position: parser.current().position(),
        count: 1,
        mode: LoremMode::PlainParagraphs,
        random: false,
    };

    if let Some(token) = args.match_kind(TokenKind::Integer) {
        statement.count = token
            .value
            .parse::<usize>()
            .ok()
            .filter(|count| *count <= lorem::MAX_COUNT)
            .ok_or_else(|| {
                ParseError::new(
                    ErrorKind::MalformedArguments,
                    format!(
                        "Lorem count '{}' is too large (at most {}).",
                        token.value,
                        lorem::MAX_COUNT
                    ),
                    token.position(),
                )
            })?;
    }

    if let Some(token) = args.match_kind(TokenKind::Name) {
        statement.mode = LoremMode::from_letter(&token.value).ok_or_else(|| {
            ParseError::new(
                ErrorKind::MalformedArguments,
                "Lorem method must be either 'w', 'p' or 'b'.",
                token.position(),
            )
        })?;
    }

    if args.match_name("random").is_some() {
        statement.random = true;
    }

    if !args.at_end() {
        return Err(args.error(ErrorKind::MalformedArguments, "Malformed lorem-tag arguments."));
    }

    Ok(Box::new(statement))
}

pub fn register(registry: &mut StatementRegistry) -> Result<(), RegistryError> {
    registry.register(TAG, parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hinge_lexer::Scanner;
    use pretty_assertions::assert_eq;

    /// Run the lorem parser on a single tag, returning the statement and
    /// whether the argument sub-parser was fully consumed.
    fn parse_tag(source: &str) -> Result<(LoremStatement, bool), ParseError> {
        let tokens = Scanner::tokenize(source).unwrap();
        let registry = StatementRegistry::builtin();
        let (mut outer, mut args) = Parser::open_tag(&tokens, &registry);
        let statement = parse(&mut outer, &mut args)?;
        let lorem = statement.downcast_ref::<LoremStatement>().unwrap().clone();
        Ok((lorem, args.at_end()))
    }

    fn render(source: &str, seed: u64) -> String {
        let registry = StatementRegistry::builtin();
        let template = Parser::parse(source, &registry).unwrap();
        let mut renderer = Renderer::with_seed(seed);
        template.execute(&mut renderer).unwrap();
        renderer.into_output()
    }

    // =========================================================================
    // Arguments
    // =========================================================================

    #[test]
    fn test_defaults() {
        let (lorem, at_end) = parse_tag("{% lorem %}").unwrap();
        assert_eq!(
            lorem,
            LoremStatement {
                position: Position::new(1, 4),
                count: 1,
                mode: LoremMode::PlainParagraphs,
                random: false,
            }
        );
        assert!(at_end);
    }

    #[test]
    fn test_all_arguments() {
        let (lorem, at_end) = parse_tag("{% lorem 3 p random %}").unwrap();
        assert_eq!(lorem.count, 3);
        assert_eq!(lorem.mode, LoremMode::HtmlParagraphs);
        assert!(lorem.random);
        assert!(at_end);
    }

    #[test]
    fn test_count_only() {
        let (lorem, _) = parse_tag("{% lorem 12 %}").unwrap();
        assert_eq!(lorem.count, 12);
        assert_eq!(lorem.mode, LoremMode::PlainParagraphs);
    }

    #[test]
    fn test_mode_only() {
        let (lorem, _) = parse_tag("{% lorem w %}").unwrap();
        assert_eq!(lorem.count, 1);
        assert_eq!(lorem.mode, LoremMode::Words);
    }

    #[test]
    fn test_zero_count_allowed() {
        let (lorem, _) = parse_tag("{% lorem 0 b %}").unwrap();
        assert_eq!(lorem.count, 0);
        assert_eq!(render("[{% lorem 0 b %}]", 0), "[]");
    }

    #[test]
    fn test_invalid_mode_letter() {
        let err = parse_tag("{% lorem 2 x %}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedArguments);
        assert_eq!(err.position(), Position::new(1, 12));
        assert!(err.message.contains("'w', 'p' or 'b'"));
    }

    #[test]
    fn test_mode_is_case_sensitive() {
        let err = parse_tag("{% lorem W %}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedArguments);
    }

    #[test]
    fn test_mode_slot_comes_before_random() {
        // The first bare name is always read as the mode.
        let err = parse_tag("{% lorem random %}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedArguments);
        assert_eq!(err.position(), Position::new(1, 10));
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse_tag("{% lorem 2 w random extra %}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedArguments);
        assert_eq!(err.position(), Position::new(1, 21));
        assert_eq!(err.message, "Malformed lorem-tag arguments.");
    }

    #[test]
    fn test_arguments_out_of_order() {
        let err = parse_tag("{% lorem w 2 %}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedArguments);
        assert_eq!(err.position(), Position::new(1, 12));
    }

    #[test]
    fn test_negative_count_rejected() {
        let err = parse_tag("{% lorem -1 %}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedArguments);
    }

    #[test]
    fn test_huge_count_rejected() {
        let err = parse_tag("{% lorem 99999999999999999999999 %}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedArguments);
        assert_eq!(err.position(), Position::new(1, 10));
    }

    #[test]
    fn test_count_above_ceiling_rejected() {
        let (statement, _) = parse_tag(&format!("{{% lorem {} w %}}", lorem::MAX_COUNT)).unwrap();
        assert_eq!(statement.count, lorem::MAX_COUNT);

        for source in [
            format!("{{% lorem {} w %}}", lorem::MAX_COUNT + 1),
            "{% lorem 18446744073709551615 w %}".to_string(),
        ] {
            let err = parse_tag(&source).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MalformedArguments);
            assert_eq!(err.position(), Position::new(1, 10));
            assert!(err.message.contains("too large"));
        }
    }

    #[test]
    fn test_oversized_node_fails_at_render() {
        let statement = LoremStatement {
            position: Position::new(3, 4),
            count: usize::MAX,
            mode: LoremMode::Words,
            random: false,
        };
        let mut renderer = Renderer::with_seed(0);
        let err = statement.execute(&mut renderer).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Statement { line: 3, column: 4, .. }
        ));
        assert_eq!(renderer.output(), "");
    }

    #[test]
    fn test_invalid_mode_through_full_parse() {
        let registry = StatementRegistry::builtin();
        let err = Parser::parse("ok\n{% lorem 2 x %}", &registry).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedArguments);
        assert_eq!(err.position(), Position::new(2, 12));
    }

    // =========================================================================
    // Execution
    // =========================================================================

    #[test]
    fn test_describe() {
        let (lorem, _) = parse_tag("{% lorem %}").unwrap();
        assert_eq!(lorem.describe(), "LoremStmt(Line=1 Col=4)");
    }

    #[test]
    fn test_words() {
        assert_eq!(render("{% lorem 4 w %}", 0), "lorem ipsum dolor sit");
    }

    #[test]
    fn test_default_is_one_plain_paragraph() {
        assert_eq!(render("{% lorem %}", 0), lorem::PARAGRAPHS[0]);
    }

    #[test]
    fn test_html_paragraphs() {
        let out = render("{% lorem 2 p %}", 0);
        assert!(out.starts_with("<p>Lorem ipsum"));
        assert_eq!(out.matches("</p>").count(), 2);
    }

    #[test]
    fn test_random_depends_on_seed_only() {
        let a = render("{% lorem 6 w random %}", 5);
        let b = render("{% lorem 6 w random %}", 5);
        assert_eq!(a, b);
        assert_eq!(a.split(' ').count(), 6);
    }

    #[test]
    fn test_execute_does_not_mutate_node() {
        let (lorem, _) = parse_tag("{% lorem 2 w random %}").unwrap();
        let before = lorem.clone();
        let mut renderer = Renderer::with_seed(3);
        lorem.execute(&mut renderer).unwrap();
        lorem.execute(&mut renderer).unwrap();
        assert_eq!(lorem, before);
        assert_eq!(renderer.output().split(' ').count(), 3);
    }
}
