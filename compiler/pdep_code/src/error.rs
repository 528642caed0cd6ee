//! Code model errors.

use pdep_ir::{AstError, ModifierError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    /// A type appears in its own inheritance chain.
    #[error("Type {name} is referenced recursively in its inheritance hierarchy.")]
    RecursiveInheritance { name: String },

    /// Two used traits contribute concrete methods of the same name and no
    /// `insteadof` rule picks one.
    #[error(
        "Trait method {method} has not been applied, because there are collisions \
         with other trait methods on {host}: {}",
        .traits.join(", ")
    )]
    TraitMethodCollision {
        method: String,
        host: String,
        traits: Vec<String>,
    },

    #[error(transparent)]
    Modifier(#[from] ModifierError),

    #[error(transparent)]
    Ast(#[from] AstError),

    #[error("failed to encode {what}: {message}")]
    Encode { what: &'static str, message: String },

    #[error("failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    #[error("unsupported model snapshot version {found}, expected {expected}")]
    SnapshotVersion { found: u32, expected: u32 },
}
