//! Tokens produced by the lexer.
//!
//! A token keeps its original image so that cached token streams can be
//! replayed without the source text.

mod kind;
mod list;

#[cfg(test)]
mod tests;

pub use kind::TokenKind;
pub use list::TokenList;

use crate::{SourceRange, Span};

/// A lexed token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub image: String,
    pub span: Span,
    pub range: SourceRange,
}

impl Token {
    pub fn new(kind: TokenKind, image: impl Into<String>, span: Span, range: SourceRange) -> Self {
        Token {
            kind,
            image: image.into(),
            span,
            range,
        }
    }

    #[inline]
    pub fn start_line(&self) -> u32 {
        self.range.start_line
    }

    #[inline]
    pub fn end_line(&self) -> u32 {
        self.range.end_line
    }

    #[inline]
    pub fn start_column(&self) -> u32 {
        self.range.start_column
    }

    #[inline]
    pub fn end_column(&self) -> u32 {
        self.range.end_column
    }

    /// Comments and doc comments.
    #[inline]
    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }
}
