//! Recursive descent parser for PHP sources.
//!
//! [`parse_unit`] lexes one file, builds its syntax tree in the builder's
//! arena and records every namespace, type and callable it declares.
//! Class names in references are resolved against the namespace and `use`
//! imports in effect, so every reference image is fully qualified.

mod cursor;
mod error;
mod grammar;
mod names;
mod stack;


use std::path::PathBuf;

use pdep_code::{CodeBuilder, CodeError, TokenCache, TypeId, UnitId};
use pdep_ir::{AstArena, NodeId, NodeKind, SourceRange, Span, Token, TokenKind, TokenList};

pub use cursor::Cursor;
pub use error::ParseError;

use names::NameScope;

/// Parser switches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Ignore `@return`, `@throws` and `@var` doc annotations.
    pub without_annotations: bool,
}

/// Parse `source` into a new compilation unit of `builder`.
///
/// When a token cache is given, the unit's tokens are stored under the
/// unit id and each callable's tokens under its cache key.
#[tracing::instrument(level = "debug", skip_all, fields(file = ?file))]
pub fn parse_unit(
    builder: &mut CodeBuilder,
    file: Option<PathBuf>,
    source: String,
    config: &ParserConfig,
    cache: Option<&mut dyn TokenCache>,
) -> Result<UnitId, ParseError> {
    let display = file
        .as_ref()
        .map_or_else(|| "unknown".to_owned(), |p| p.display().to_string());
    let tokens = pdep_lexer::lex(&source).map_err(|source| ParseError::Lex {
        file: display.clone(),
        source,
    })?;
    let source_len = u32::try_from(source.len()).unwrap_or(u32::MAX);
    let unit = builder.begin_unit(file, Some(source))?;

    Parser::new(&tokens, builder, config, unit, display).parse(source_len)?;

    if let Some(cache) = cache {
        cache_tokens(builder, unit, &tokens, cache)?;
    }
    Ok(unit)
}

fn cache_tokens(
    builder: &CodeBuilder,
    unit: UnitId,
    tokens: &TokenList,
    cache: &mut dyn TokenCache,
) -> Result<(), CodeError> {
    let model = builder.model();
    let all: Vec<Token> = tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .cloned()
        .collect();
    cache.store_tokens(model.unit(unit).id(), &all)?;
    for (_, callable) in model.callables().filter(|(_, c)| c.unit() == Some(unit)) {
        let span = model.ast().get(callable.node()).span;
        let within: Vec<Token> = tokens.within(span).cloned().collect();
        cache.store_tokens(callable.cache_key(), &within)?;
    }
    tracing::debug!(tokens = all.len(), "cached unit tokens");
    Ok(())
}

/// Start of a node: the position of its first token.
#[derive(Copy, Clone, Debug)]
struct Mark {
    span: Span,
    range: SourceRange,
}

/// Parser state for one compilation unit.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    builder: &'a mut CodeBuilder,
    config: &'a ParserConfig,
    unit: UnitId,
    file: String,
    names: NameScope,
    /// Type whose body is being parsed.
    current_type: Option<TypeId>,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: &'a TokenList,
        builder: &'a mut CodeBuilder,
        config: &'a ParserConfig,
        unit: UnitId,
        file: String,
    ) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            builder,
            config,
            unit,
            file,
            names: NameScope::default(),
            current_type: None,
        }
    }

    /// Parse the whole token stream into the unit's root node.
    pub fn parse(mut self, source_len: u32) -> Result<(), ParseError> {
        let root = self.builder.unit(self.unit).node();
        while !self.is_at_end() {
            if let Some(node) = self.parse_top_statement()? {
                self.attach(root, node)?;
            }
        }
        let last = self.cursor.previous();
        let range = SourceRange::new(1, 1, last.end_line().max(1), last.end_column().max(1));
        self.ast().set_position(root, Span::new(0, source_len), range);
        Ok(())
    }

    // === Cursor delegation ===

    #[inline]
    fn current(&self) -> &'a Token {
        self.cursor.current()
    }

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn peek(&self, n: usize) -> &'a Token {
        self.cursor.peek(n)
    }

    #[inline]
    fn peek_kind(&self, n: usize) -> TokenKind {
        self.cursor.peek_kind(n)
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn eat(&mut self, kind: TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    #[inline]
    fn advance(&mut self) -> &'a Token {
        self.cursor.advance()
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Syntax error at the current token.
    fn unexpected(&self) -> ParseError {
        ParseError::unexpected(self.current(), &self.file)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    /// An identifier or a reserved word used as a name.
    fn expect_name(&mut self) -> Result<&'a Token, ParseError> {
        let kind = self.current_kind();
        if kind == TokenKind::Identifier || kind.is_keyword() {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    /// `;`, or `?>` which ends a statement as well.
    fn expect_terminator(&mut self) -> Result<(), ParseError> {
        if self.eat(TokenKind::Semicolon) || self.eat(TokenKind::CloseTag) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Text of the doc comment right before the current token.
    fn doc_comment(&self) -> Option<String> {
        self.cursor.doc_comment().map(|t| t.image.clone())
    }

    // === Node helpers ===

    #[inline]
    fn ast(&mut self) -> &mut AstArena {
        self.builder.ast_mut()
    }

    fn alloc(&mut self, kind: NodeKind, image: impl Into<String>) -> Result<NodeId, ParseError> {
        Ok(self.ast().alloc(kind, image)?)
    }

    /// A node covering exactly `token`.
    fn leaf(&mut self, kind: NodeKind, image: impl Into<String>, token: &Token) -> Result<NodeId, ParseError> {
        Ok(self.ast().alloc_at(kind, image, token.span, token.range)?)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), ParseError> {
        self.ast().add_child(parent, child)?;
        Ok(())
    }

    fn mark(&self) -> Mark {
        let token = self.current();
        Mark {
            span: token.span,
            range: token.range,
        }
    }

    fn mark_of(&self, node: NodeId) -> Mark {
        let node = self.builder.ast().get(node);
        Mark {
            span: node.span,
            range: node.range,
        }
    }

    /// Position `node` from `mark` to the end of the last consumed token.
    fn close(&mut self, node: NodeId, mark: Mark) {
        let last = self.cursor.previous();
        let span = Span::new(mark.span.start, last.span.end.max(mark.span.start));
        let range = mark.range.to(last.range);
        self.ast().set_position(node, span, range);
    }
}
