//! Template parser.
//!
//! Walks the token stream from `hinge-lexer`, turning data tokens into
//! [`Node::Data`] and dispatching each `{% name ... %}` tag to the parser
//! function registered for `name`.
//!
//! The same [`Parser`] type serves as the argument sub-parser: a cursor over
//! the shared token slice bounded to one tag's arguments. A sub-parser has
//! its own position and cannot move the outer parser.

use hinge_lexer::{LexerConfig, Scanner, Span, Token, TokenKind};
use tracing::{debug, trace};

use crate::nodes::{Data, Node, Statement, Template};
use crate::registry::StatementRegistry;
use crate::{ErrorKind, ParseError};

/// Cursor over a token stream, or over one tag's slice of it.
pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    /// Exclusive bound; the cursor never moves past it.
    end: usize,
    registry: &'t StatementRegistry,
    /// Returned by `current()` once the cursor reaches `end`, positioned
    /// where the region stops.
    sentinel: Token,
}

impl<'t> Parser<'t> {
    /// Create a parser over a full token stream.
    pub fn new(tokens: &'t [Token], registry: &'t StatementRegistry) -> Self {
        Self::bounded(tokens, 0, tokens.len(), registry)
    }

    fn bounded(
        tokens: &'t [Token],
        start: usize,
        end: usize,
        registry: &'t StatementRegistry,
    ) -> Self {
        let span = tokens
            .get(end)
            .or_else(|| tokens.last())
            .map(|t| t.span)
            .unwrap_or(Span::new(0, 0, 1, 1));

        Self {
            tokens,
            pos: start,
            end,
            registry,
            sentinel: Token::new(TokenKind::Eof, "", span),
        }
    }

    /// Compile template source with the default delimiters.
    pub fn parse(source: &str, registry: &StatementRegistry) -> Result<Template, ParseError> {
        Self::parse_with(source, &LexerConfig::default(), registry)
    }

    /// Compile template source with custom delimiters.
    pub fn parse_with(
        source: &str,
        config: &LexerConfig,
        registry: &StatementRegistry,
    ) -> Result<Template, ParseError> {
        let tokens = Scanner::tokenize_with(source, config)?;

        let mut parser = Parser::new(&tokens, registry);
        let template = parser.parse_template()?;
        debug!(
            tokens = tokens.len(),
            nodes = template.nodes.len(),
            "compiled template"
        );
        Ok(template)
    }

    /// Parse every remaining token into template nodes.
    pub fn parse_template(&mut self) -> Result<Template, ParseError> {
        let mut nodes = Vec::new();

        while !self.at_end() {
            let token = self.tokens[self.pos].clone();
            match token.kind {
                TokenKind::Data => {
                    self.advance();
                    nodes.push(Node::Data(Data {
                        position: token.position(),
                        text: token.value,
                    }));
                }
                TokenKind::BlockBegin => {
                    nodes.push(Node::Statement(self.parse_statement()?));
                }
                kind => {
                    return Err(self.error(
                        ErrorKind::UnexpectedToken,
                        format!("Unexpected {kind} '{}' outside of a tag", token.value),
                    ));
                }
            }
        }

        Ok(Template { nodes })
    }

    // =========================================================================
    // Tag dispatch
    // =========================================================================

    /// Parse `{% name args... %}` through the registry.
    fn parse_statement(&mut self) -> Result<Box<dyn Statement>, ParseError> {
        self.advance(); // consume `{%`

        let close = self.find_block_end()?;

        let name_index = self.pos;
        let Some(name) = self.match_kind(TokenKind::Name) else {
            return Err(self.error(
                ErrorKind::UnexpectedToken,
                format!("Expected tag name, got {}", self.current().kind),
            ));
        };

        let Some(parse_fn) = self.registry.lookup(&name.value) else {
            return Err(ParseError::new(
                ErrorKind::UnknownTag,
                format!("Unknown tag '{}'", name.value),
                name.position(),
            ));
        };

        let mut args = Parser::bounded(self.tokens, self.pos, close, self.registry);

        trace!(
            tag = %name.value,
            line = name.span.line,
            column = name.span.column,
            args = close - self.pos,
            "dispatching tag"
        );

        // The tag parser sees the tag name as the outer parser's current token.
        self.pos = name_index;
        let statement = parse_fn(self, &mut args)?;

        if self.pos <= close {
            self.pos = close + 1;
        }

        Ok(statement)
    }

    /// Index of the `%}` closing the tag the cursor is in.
    ///
    /// Fails on any character the lexer could not classify inside the tag.
    fn find_block_end(&self) -> Result<usize, ParseError> {
        for index in self.pos..self.end {
            let token = &self.tokens[index];
            match token.kind {
                TokenKind::BlockEnd => return Ok(index),
                TokenKind::BlockBegin | TokenKind::Eof => break,
                TokenKind::Unknown => {
                    return Err(ParseError::new(
                        ErrorKind::Lexer,
                        format!("Unexpected character in tag: '{}'", token.value),
                        token.position(),
                    ));
                }
                _ => {}
            }
        }

        Err(self.error(
            ErrorKind::UnterminatedBlock,
            "Unclosed tag: missing block end delimiter",
        ))
    }

    // =========================================================================
    // Cursor operations used by tag parsers
    // =========================================================================

    /// The token under the cursor, without consuming it.
    pub fn current(&self) -> &Token {
        if self.pos < self.end {
            &self.tokens[self.pos]
        } else {
            &self.sentinel
        }
    }

    /// Consume the current token if it has the given kind.
    pub fn match_kind(&mut self, kind: TokenKind) -> Option<&'t Token> {
        let tokens = self.tokens;
        if self.at_end() || tokens[self.pos].kind != kind {
            return None;
        }
        self.pos += 1;
        Some(&tokens[self.pos - 1])
    }

    /// Consume the current token if it is the bare name `name`.
    pub fn match_name(&mut self, name: &str) -> Option<&'t Token> {
        let tokens = self.tokens;
        if self.at_end() || !tokens[self.pos].is_name(name) {
            return None;
        }
        self.pos += 1;
        Some(&tokens[self.pos - 1])
    }

    /// True once every token in this parser's region has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.end || self.tokens[self.pos].kind == TokenKind::Eof
    }

    /// Build an error positioned at the current token.
    pub fn error(&self, kind: ErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::new(kind, message, self.current().position())
    }

    /// Skip tokens until just past `{% name %}`.
    ///
    /// Everything in between is discarded, including tags with other names.
    /// Fails with [`ErrorKind::UnterminatedBlock`] at the token where
    /// skipping started if the input ends first.
    pub fn skip_until(&mut self, name: &str) -> Result<(), ParseError> {
        let start = self.current().position();
        let tokens = self.tokens;

        while !self.at_end() {
            let opens_marker = tokens[self.pos].kind == TokenKind::BlockBegin
                && self.pos + 1 < self.end
                && tokens[self.pos + 1].is_name(name);

            if opens_marker {
                self.pos += 2;
                if self.match_kind(TokenKind::BlockEnd).is_none() {
                    return Err(self.error(
                        ErrorKind::MalformedArguments,
                        format!("Tag '{name}' does not take any argument."),
                    ));
                }
                trace!(marker = name, skipped_from = %start, "skipped block body");
                return Ok(());
            }

            self.pos += 1;
        }

        Err(ParseError::new(
            ErrorKind::UnterminatedBlock,
            format!("Unexpected end of template: '{name}' tag not found"),
            start,
        ))
    }

    /// The registry this parser dispatches through.
    pub fn registry(&self) -> &'t StatementRegistry {
        self.registry
    }

    fn advance(&mut self) {
        if self.pos < self.end {
            self.pos += 1;
        }
    }

    /// Position the parser on a single tag the way `parse_statement` does
    /// before calling a tag parser: outer cursor on the tag name, plus the
    /// bounded argument sub-parser.
    #[cfg(test)]
    pub(crate) fn open_tag(
        tokens: &'t [Token],
        registry: &'t StatementRegistry,
    ) -> (Parser<'t>, Parser<'t>) {
        let mut outer = Parser::new(tokens, registry);
        outer.advance(); // `{%`
        let name_index = outer.pos;
        outer.advance(); // name
        let close = outer.find_block_end().unwrap();
        let args = Parser::bounded(tokens, outer.pos, close, registry);
        outer.pos = name_index;
        (outer, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statements::{CommentStatement, LoremStatement};
    use hinge_exec::Renderer;
    use hinge_lexer::Position;
    use pretty_assertions::assert_eq;

    fn registry() -> StatementRegistry {
        StatementRegistry::builtin()
    }

    fn parse(source: &str) -> Template {
        Parser::parse(source, &registry()).unwrap()
    }

    fn parse_err(source: &str) -> ParseError {
        Parser::parse(source, &registry()).unwrap_err()
    }

    fn render(source: &str) -> String {
        let template = parse(source);
        let mut renderer = Renderer::with_seed(0);
        template.execute(&mut renderer).unwrap();
        renderer.into_output()
    }

    fn tokens(source: &str) -> Vec<Token> {
        Scanner::tokenize(source).unwrap()
    }

    // =========================================================================
    // Template loop
    // =========================================================================

    #[test]
    fn test_empty_template() {
        assert!(parse("").nodes.is_empty());
    }

    #[test]
    fn test_plain_text() {
        let template = parse("Hello\nworld");
        assert_eq!(template.nodes.len(), 1);
        assert!(matches!(&template.nodes[0], Node::Data(d) if d.text == "Hello\nworld"));
    }

    #[test]
    fn test_text_around_tags() {
        let template = parse("a{% lorem 1 w %}b");
        assert_eq!(template.nodes.len(), 3);
        assert!(matches!(&template.nodes[1], Node::Statement(_)));
        assert_eq!(render("a{% lorem 1 w %}b"), "aloremb");
    }

    #[test]
    fn test_unknown_tag() {
        let err = parse_err("x\n{% nope 1 %}");
        assert_eq!(err.kind, ErrorKind::UnknownTag);
        assert_eq!(err.position(), Position::new(2, 4));
        assert!(err.message.contains("nope"));
    }

    #[test]
    fn test_stray_end_marker() {
        let err = parse_err("{% endcomment %}");
        assert_eq!(err.kind, ErrorKind::UnknownTag);
    }

    #[test]
    fn test_missing_tag_name() {
        let err = parse_err("{% 3 %}");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        assert_eq!(err.position(), Position::new(1, 4));
    }

    #[test]
    fn test_empty_tag() {
        let err = parse_err("{% %}");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        assert!(err.message.contains("block end"));
    }

    #[test]
    fn test_lexer_error_converted() {
        let err = parse_err("{% lorem \"open %}");
        assert_eq!(err.kind, ErrorKind::Lexer);
        assert_eq!(err.position(), Position::new(1, 10));
    }

    #[test]
    fn test_statement_position_is_tag_name() {
        let template = parse("ab\n  {%   lorem   2   %}");
        assert_eq!(template.nodes[1].position(), Position::new(2, 8));
    }

    #[test]
    fn test_custom_delimiters() {
        let config = LexerConfig {
            block_start: "<%".into(),
            block_end: "%>".into(),
            ..LexerConfig::default()
        };
        let template = Parser::parse_with("{{x}}<% lorem 2 w %>", &config, &registry()).unwrap();
        let mut renderer = Renderer::with_seed(0);
        template.execute(&mut renderer).unwrap();
        assert_eq!(renderer.output(), "{{x}}lorem ipsum");
    }

    // =========================================================================
    // Cursor operations
    // =========================================================================

    #[test]
    fn test_sub_parser_bounded_to_arguments() {
        let toks = tokens("{% lorem 3 p random %}after");
        let registry = registry();
        let (outer, mut args) = Parser::open_tag(&toks, &registry);

        assert_eq!(outer.current().value, "lorem");
        assert_eq!(args.current().value, "3");
        assert!(args.match_kind(TokenKind::Integer).is_some());
        assert!(args.match_kind(TokenKind::Integer).is_none());
        assert_eq!(args.match_name("p").map(|t| t.value.as_str()), Some("p"));
        assert!(args.match_name("Random").is_none());
        assert!(args.match_name("random").is_some());
        assert!(args.at_end());

        // At its bound the sub-parser yields nothing more, even though the
        // stream continues with `%}` and data.
        assert!(args.match_kind(TokenKind::BlockEnd).is_none());
        assert_eq!(args.current().kind, TokenKind::Eof);
        assert_eq!(args.current().position(), Position::new(1, 21));

        // The outer parser did not move.
        assert_eq!(outer.current().value, "lorem");
    }

    #[test]
    fn test_empty_argument_region() {
        let toks = tokens("{% comment %}");
        let registry = registry();
        let (_, args) = Parser::open_tag(&toks, &registry);
        assert!(args.at_end());
    }

    #[test]
    fn test_error_uses_current_position() {
        let toks = tokens("{% lorem 2 x %}");
        let registry = registry();
        let (_, mut args) = Parser::open_tag(&toks, &registry);
        args.match_kind(TokenKind::Integer);
        let err = args.error(ErrorKind::MalformedArguments, "bad");
        assert_eq!(err.position(), Position::new(1, 12));
        assert_eq!(err.message, "bad");
        assert!(err.cause.is_none());
    }

    #[test]
    fn test_skip_until_consumes_end_marker() {
        let toks = tokens("{% comment %}a{% lorem %}b{% endcomment %}tail");
        let registry = registry();
        let (mut outer, _) = Parser::open_tag(&toks, &registry);
        outer.skip_until("endcomment").unwrap();
        assert_eq!(outer.current().kind, TokenKind::Data);
        assert_eq!(outer.current().value, "tail");
    }

    #[test]
    fn test_skip_until_end_of_input() {
        let toks = tokens("{% comment %}\nnever closed {% lorem %}");
        let registry = registry();
        let (mut outer, _) = Parser::open_tag(&toks, &registry);
        let err = outer.skip_until("endcomment").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedBlock);
        assert_eq!(err.position(), Position::new(1, 4));
        assert!(outer.at_end());
    }

    #[test]
    fn test_skip_until_rejects_marker_arguments() {
        let err = parse_err("{% comment %}x{% endcomment now %}");
        assert_eq!(err.kind, ErrorKind::MalformedArguments);
        assert_eq!(err.position(), Position::new(1, 29));
    }

    #[test]
    fn test_unknown_character_in_parsed_tag() {
        let err = parse_err("ok\n{% lorem 2 @ %}");
        assert_eq!(err.kind, ErrorKind::Lexer);
        assert_eq!(err.position(), Position::new(2, 12));
        assert_eq!(err.message, "Unexpected character in tag: '@'");

        let err = parse_err("{% & %}");
        assert_eq!(err.kind, ErrorKind::Lexer);
    }

    #[test]
    fn test_unknown_character_in_skipped_body() {
        assert_eq!(
            render("a{% comment %}{% if a & b %}{% endcomment %}b"),
            "ab"
        );
    }

    #[test]
    fn test_registry_accessor() {
        let toks = tokens("");
        let registry = registry();
        let parser = Parser::new(&toks, &registry);
        assert!(parser.registry().contains("comment"));
        assert!(parser.at_end());
    }

    // =========================================================================
    // Built-in statements end to end
    // =========================================================================

    #[test]
    fn test_comment_and_lorem_together() {
        let template = parse(
            "{% comment %}{% lorem 9 %}{% endcomment %}[{% lorem 3 w %}]{% comment %}x{% endcomment %}",
        );
        assert_eq!(template.nodes.len(), 5);
        assert!(template.nodes[0]
            .describe()
            .starts_with("CommentStmt(Line=1 Col=4)"));
        let lorem = match &template.nodes[2] {
            Node::Statement(s) => s.downcast_ref::<LoremStatement>().unwrap(),
            other => panic!("Expected lorem, got {other:?}"),
        };
        assert_eq!(lorem.count, 3);
        assert!(matches!(
            &template.nodes[4],
            Node::Statement(s) if s.downcast_ref::<CommentStatement>().is_some()
        ));

        let mut renderer = Renderer::with_seed(0);
        template.execute(&mut renderer).unwrap();
        assert_eq!(renderer.output(), "[lorem ipsum dolor]");
    }

    #[test]
    fn test_compiled_template_shared_across_threads() {
        let template = parse("{% lorem 4 w random %}|{% lorem 1 w %}");
        let outputs: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let template = &template;
                    scope.spawn(move || {
                        let mut renderer = Renderer::with_seed(11);
                        template.execute(&mut renderer).unwrap();
                        renderer.into_output()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(outputs.iter().all(|o| o == &outputs[0]));
        assert!(outputs[0].ends_with("|lorem"));
    }
}
