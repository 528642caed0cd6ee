//! Token list with a guaranteed trailing EOF token.

use std::ops::Index;

use super::{Token, TokenKind};
use crate::{SourceRange, Span};

/// A list of tokens.
///
/// The last token is always [`TokenKind::Eof`] once [`TokenList::finish`]
/// has been called, so cursors can peek past the end without bounds checks.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    #[inline]
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        TokenList {
            tokens: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Append the EOF sentinel positioned right after the last token.
    pub fn finish(&mut self, source_len: u32) {
        if self.tokens.last().is_some_and(|t| t.kind == TokenKind::Eof) {
            return;
        }
        let range = self.tokens.last().map_or(SourceRange::new(1, 1, 1, 1), |t| {
            let column = t.range.end_column + 1;
            SourceRange::new(t.range.end_line, column, t.range.end_line, column)
        });
        self.tokens.push(Token::new(
            TokenKind::Eof,
            "",
            Span::point(source_len),
            range,
        ));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens whose byte span lies inside `span`.
    pub fn within(&self, span: Span) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(move |t| {
                t.kind != TokenKind::Eof && t.span.start >= span.start && t.span.end <= span.end
            })
    }

    pub fn into_vec(self) -> Vec<Token> {
        self.tokens
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    #[inline]
    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl From<Vec<Token>> for TokenList {
    fn from(tokens: Vec<Token>) -> Self {
        TokenList { tokens }
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
