//! pdep IR - positions, tokens and the syntax tree
//!
//! This crate holds the data structures shared by every pdep stage:
//! - Spans and 1-based line/column ranges
//! - Tokens and `TokenList` for lexer output
//! - Declaration modifiers with assign-once validation
//! - The arena-allocated AST with parent/child links
//!
//! With the `cache` feature every type here derives serde traits so token
//! streams and syntax trees can be persisted.

mod error;
mod modifiers;
mod span;
mod traits;

pub mod ast;
pub mod token;
pub mod visitor;

pub use ast::{
    AstArena, AstNode, NodeFlags, NodeId, NodeKind, NodeMetadata, NodeSnapshot, TreeSnapshot,
    SNAPSHOT_VERSION,
};
pub use error::AstError;
pub use modifiers::{DeclarationKind, ModifierError, ModifierSlot, Modifiers};
pub use span::{LineIndex, SourceRange, Span, SpanError};
pub use token::{Token, TokenKind, TokenList};
pub use traits::Spanned;
pub use visitor::Visitor;
