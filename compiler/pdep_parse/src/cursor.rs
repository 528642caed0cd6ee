//! Token cursor for navigating the token stream.
//!
//! The cursor only ever rests on significant tokens: comments, doc
//! comments, open tags and inline HTML are stepped over. Doc comments stay
//! reachable through [`Cursor::doc_comment`].

use pdep_ir::{SourceRange, Span, Token, TokenKind, TokenList};

static EOF: Token = Token {
    kind: TokenKind::Eof,
    image: String::new(),
    span: Span::DUMMY,
    range: SourceRange::new(0, 0, 0, 0),
};

pub struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
    /// Index of the last consumed token.
    prev: Option<usize>,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        let mut cursor = Cursor {
            tokens,
            pos: 0,
            prev: None,
        };
        cursor.skip_insignificant();
        cursor
    }

    fn skip_insignificant(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .is_some_and(|t| t.kind.is_insignificant())
        {
            self.pos += 1;
        }
    }

    #[inline]
    fn token_at(&self, index: usize) -> &'a Token {
        self.tokens.get(index).unwrap_or(&EOF)
    }

    /// Current position in the token stream.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        self.token_at(self.pos)
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// The `n`-th significant token after the current one.
    pub fn peek(&self, n: usize) -> &'a Token {
        self.tokens
            .as_slice()
            .iter()
            .skip(self.pos + 1)
            .filter(|t| !t.kind.is_insignificant())
            .nth(n.saturating_sub(1))
            .unwrap_or(&EOF)
    }

    #[inline]
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.peek(n).kind
    }

    /// The last consumed token, or the current one before any advance.
    pub fn previous(&self) -> &'a Token {
        self.prev.map_or_else(|| self.current(), |i| self.token_at(i))
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consume the current token and move to the next significant one.
    ///
    /// At EOF the cursor stays put.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.prev = Some(self.pos);
            self.pos += 1;
            self.skip_insignificant();
        }
        tracing::trace!(kind = ?token.kind, image = %token.image, "advance");
        token
    }

    /// Consume the current token if it is `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Whether the current token starts exactly where the previous one ended.
    pub fn adjacent_to_previous(&self) -> bool {
        self.prev
            .is_some_and(|i| self.token_at(i).span.end == self.current().span.start)
    }

    /// Nearest doc comment before the current token, looking back across
    /// comments and whitespace only.
    pub fn doc_comment(&self) -> Option<&'a Token> {
        self.tokens
            .as_slice()
            .get(..self.pos)?
            .iter()
            .rev()
            .take_while(|t| t.kind.is_trivia())
            .find(|t| t.kind == TokenKind::DocComment)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn skips_trivia_and_tags() {
        let tokens = pdep_lexer::lex("<?php /* c */ $a // x\n = 1;").unwrap();
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(cursor.current_kind(), TokenKind::Variable);
        assert_eq!(cursor.peek_kind(1), TokenKind::Equal);
        assert_eq!(cursor.peek_kind(2), TokenKind::Integer);
        cursor.advance();
        assert!(cursor.eat(TokenKind::Equal));
        assert_eq!(cursor.previous().image, "=");
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_at_end());
        cursor.advance();
        assert!(cursor.is_at_end());
    }

    #[test]
    fn doc_comment_is_found_before_declaration() {
        let tokens = pdep_lexer::lex("<?php /** Doc */\n// note\nclass A {}").unwrap();
        let cursor = Cursor::new(&tokens);
        assert_eq!(cursor.current_kind(), TokenKind::Class);
        assert_eq!(cursor.doc_comment().unwrap().image, "/** Doc */");
    }

    #[test]
    fn doc_comment_does_not_cross_code() {
        let tokens = pdep_lexer::lex("<?php /** Doc */ $a; class A {}").unwrap();
        let mut cursor = Cursor::new(&tokens);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.current_kind(), TokenKind::Class);
        assert!(cursor.doc_comment().is_none());
    }
}
