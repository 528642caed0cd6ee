//! Parse errors.

use pdep_code::CodeError;
use pdep_ir::{AstError, ModifierError, Token, TokenKind};
use pdep_lexer::LexError;

/// Why parsing a compilation unit failed.
///
/// Syntax errors carry the offending token image, its position and the
/// file name; errors raised while recording artifacts wrap the model error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unexpected token: {image}, line: {line}, col: {column}, file: {file}")]
    UnexpectedToken {
        image: String,
        line: u32,
        column: u32,
        file: String,
    },
    #[error("Unexpected end of token stream in file: {file}")]
    UnexpectedEnd { file: String },
    #[error("{file}: {source}")]
    Lex {
        file: String,
        #[source]
        source: LexError,
    },
    #[error(transparent)]
    Modifier(#[from] ModifierError),
    #[error(transparent)]
    Ast(#[from] AstError),
    #[error(transparent)]
    Code(#[from] CodeError),
}

impl ParseError {
    /// Syntax error for `token`, or [`ParseError::UnexpectedEnd`] at EOF.
    pub(crate) fn unexpected(token: &Token, file: &str) -> Self {
        if token.kind == TokenKind::Eof {
            return ParseError::UnexpectedEnd {
                file: file.to_owned(),
            };
        }
        ParseError::UnexpectedToken {
            image: token.image.clone(),
            line: token.start_line(),
            column: token.start_column(),
            file: file.to_owned(),
        }
    }

    /// Line of a syntax error.
    pub fn line(&self) -> Option<u32> {
        match self {
            ParseError::UnexpectedToken { line, .. } => Some(*line),
            ParseError::Lex { source, .. } => source.line(),
            _ => None,
        }
    }

    /// True for errors caused by malformed input rather than model rules.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            ParseError::UnexpectedToken { .. } | ParseError::UnexpectedEnd { .. } | ParseError::Lex { .. }
        )
    }
}
