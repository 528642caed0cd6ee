//! Lexer errors.

use pdep_ir::SpanError;

/// A tokenizer failure with its 1-based position.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}' on line {line}, column {column}")]
    UnexpectedCharacter { ch: char, line: u32, column: u32 },
    #[error("Unterminated comment starting on line {line}, column {column}")]
    UnterminatedComment { line: u32, column: u32 },
    #[error("Unterminated string starting on line {line}, column {column}")]
    UnterminatedString { line: u32, column: u32 },
    #[error(transparent)]
    SourceTooLarge(#[from] SpanError),
}

impl LexError {
    /// Line the error was reported on, if it carries a position.
    pub fn line(&self) -> Option<u32> {
        match self {
            LexError::UnexpectedCharacter { line, .. }
            | LexError::UnterminatedComment { line, .. }
            | LexError::UnterminatedString { line, .. } => Some(*line),
            LexError::SourceTooLarge(_) => None,
        }
    }
}
