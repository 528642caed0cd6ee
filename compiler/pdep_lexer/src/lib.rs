//! PHP lexer for pdep, built on logos.
//!
//! [`lex`] splits a file into inline HTML and code regions and tokenizes
//! each code region. Every token keeps its image, byte span and 1-based
//! line/column range, so a token stream can be cached and replayed
//! without the source text.

mod lex_error;
mod raw_token;
mod tags;


use logos::Logos;
use pdep_ir::{LineIndex, Span, Token, TokenKind, TokenList};

pub use lex_error::LexError;

use raw_token::{RawError, RawToken};

/// Tokenize a PHP source file.
///
/// The returned list always ends with a single [`TokenKind::Eof`].
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn lex(source: &str) -> Result<TokenList, LexError> {
    let source_len = Span::try_from_range(0..source.len())?.end;
    let index = LineIndex::new(source);
    let mut out = Lexed {
        source,
        index: &index,
        tokens: TokenList::with_capacity(source.len() / 4),
    };

    let mut offset = 0;
    while offset < source.len() {
        let Some(tag) = tags::find_open_tag(source, offset) else {
            out.push(TokenKind::InlineHtml, offset..source.len())?;
            break;
        };
        if tag.start > offset {
            out.push(TokenKind::InlineHtml, offset..tag.start)?;
        }
        out.push(tag.kind, tag.start..tag.start + tag.len)?;
        offset = out.lex_code(tag.start + tag.len)?;
    }

    let mut tokens = out.tokens;
    tokens.finish(source_len);
    tracing::debug!(tokens = tokens.len(), "lexed source");
    Ok(tokens)
}

struct Lexed<'a> {
    source: &'a str,
    index: &'a LineIndex,
    tokens: TokenList,
}

impl Lexed<'_> {
    fn push(&mut self, kind: TokenKind, range: std::ops::Range<usize>) -> Result<(), LexError> {
        let span = Span::try_from_range(range.clone())?;
        let image = &self.source[range];
        let token_range = self.index.range(self.source, span);
        self.tokens.push(Token::new(kind, image, span, token_range));
        Ok(())
    }

    /// Tokenize code starting at `start`; returns the offset after `?>`
    /// or the end of input.
    fn lex_code(&mut self, start: usize) -> Result<usize, LexError> {
        let mut lexer = RawToken::lexer(&self.source[start..]);
        while let Some(result) = lexer.next() {
            let range = lexer.span();
            let range = start + range.start..start + range.end;
            match result {
                Ok(raw) => {
                    let kind = convert_token(raw, lexer.slice());
                    self.push(kind, range.clone())?;
                    if raw == RawToken::CloseTag {
                        return Ok(range.end);
                    }
                }
                Err(err) => return Err(self.error(err, range.start)),
            }
        }
        Ok(self.source.len())
    }

    fn error(&self, err: RawError, offset: usize) -> LexError {
        let at = u32::try_from(offset).unwrap_or(u32::MAX);
        let (line, column) = self.index.line_column(self.source, at);
        let ch = self.source[offset..].chars().next().unwrap_or('\0');
        match err {
            RawError::UnterminatedComment => LexError::UnterminatedComment { line, column },
            RawError::UnterminatedString => LexError::UnterminatedString { line, column },
            RawError::Unexpected if ch == '\'' || ch == '"' => {
                LexError::UnterminatedString { line, column }
            }
            RawError::Unexpected => LexError::UnexpectedCharacter { ch, line, column },
        }
    }
}

fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::CloseTag => TokenKind::CloseTag,
        RawToken::BlockComment => {
            if slice.starts_with("/**") && slice.len() > 4 {
                TokenKind::DocComment
            } else {
                TokenKind::Comment
            }
        }
        RawToken::LineComment => TokenKind::Comment,

        RawToken::Variable => TokenKind::Variable,
        RawToken::Ident => {
            TokenKind::keyword(&slice.to_ascii_lowercase()).unwrap_or(TokenKind::Identifier)
        }
        RawToken::QualifiedName => TokenKind::QualifiedName,

        RawToken::Integer => TokenKind::Integer,
        RawToken::Float => TokenKind::Float,
        RawToken::SingleQuoted => TokenKind::ConstantString,
        RawToken::DoubleQuoted => TokenKind::DoubleQuotedString,
        RawToken::Heredoc if slice[3..].trim_start_matches([' ', '\t']).starts_with('\'') => {
            TokenKind::ConstantString
        }
        RawToken::Heredoc => TokenKind::DoubleQuotedString,

        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::NullsafeArrow => TokenKind::NullsafeArrow,
        RawToken::DoubleArrow => TokenKind::DoubleArrow,
        RawToken::DoubleColon => TokenKind::DoubleColon,
        RawToken::Question => TokenKind::Question,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Ellipsis => TokenKind::Ellipsis,
        RawToken::Dollar => TokenKind::Dollar,
        RawToken::At => TokenKind::At,

        RawToken::Equal => TokenKind::Equal,
        RawToken::PlusEqual => TokenKind::PlusEqual,
        RawToken::MinusEqual => TokenKind::MinusEqual,
        RawToken::MulEqual => TokenKind::MulEqual,
        RawToken::DivEqual => TokenKind::DivEqual,
        RawToken::ConcatEqual => TokenKind::ConcatEqual,
        RawToken::ModEqual => TokenKind::ModEqual,
        RawToken::PowEqual => TokenKind::PowEqual,
        RawToken::AndEqual => TokenKind::AndEqual,
        RawToken::OrEqual => TokenKind::OrEqual,
        RawToken::XorEqual => TokenKind::XorEqual,
        RawToken::ShiftLeftEqual => TokenKind::ShiftLeftEqual,
        RawToken::ShiftRightEqual => TokenKind::ShiftRightEqual,
        RawToken::CoalesceEqual => TokenKind::CoalesceEqual,

        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Pow => TokenKind::Pow,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Ampersand => TokenKind::Ampersand,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::ShiftLeft => TokenKind::ShiftLeft,
        RawToken::ShiftRight => TokenKind::ShiftRight,
        RawToken::BooleanAnd => TokenKind::BooleanAnd,
        RawToken::BooleanOr => TokenKind::BooleanOr,
        RawToken::Bang => TokenKind::Bang,
        RawToken::IsEqual => TokenKind::IsEqual,
        RawToken::IsNotEqual => TokenKind::IsNotEqual,
        RawToken::IsIdentical => TokenKind::IsIdentical,
        RawToken::IsNotIdentical => TokenKind::IsNotIdentical,
        RawToken::Less => TokenKind::Less,
        RawToken::Greater => TokenKind::Greater,
        RawToken::LessEqual => TokenKind::LessEqual,
        RawToken::GreaterEqual => TokenKind::GreaterEqual,
        RawToken::Spaceship => TokenKind::Spaceship,
        RawToken::Coalesce => TokenKind::Coalesce,
        RawToken::Increment => TokenKind::Increment,
        RawToken::Decrement => TokenKind::Decrement,
    }
}
