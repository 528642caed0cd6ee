//! Arena-allocated PHP syntax tree.
//!
//! Nodes live in a flat [`AstArena`] and refer to each other by [`NodeId`].
//! Every node knows its parent and its ordered children; the arena keeps the
//! two directions consistent on every mutation.
//!
//! # Specialisation
//!
//! Node kinds form a small "is a" chain (see [`NodeKind::parent_kind`]).
//! Queries such as [`AstArena::first_child_of_kind`] match a node whose kind
//! is the requested kind or specialises it.

mod arena;
mod kind;
mod node;
mod snapshot;

#[cfg(test)]
mod tests;

use std::fmt;

pub use arena::AstArena;
pub use kind::NodeKind;
pub use node::{AstNode, NodeFlags, NodeMetadata};
pub use snapshot::{NodeSnapshot, TreeSnapshot, SNAPSHOT_VERSION};

/// Index of a node in an [`AstArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}
