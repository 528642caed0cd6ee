//! Errors raised by tree operations.

use crate::ast::{NodeId, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AstError {
    /// `child(index)` outside `[0, len)`.
    #[error("No node found at index {index} in node of type: {kind}")]
    ChildOutOfBounds {
        index: usize,
        len: usize,
        kind: NodeKind,
    },
    /// Attaching a node below itself or one of its descendants.
    #[error("cannot attach {child:?} below {parent:?}: it is an ancestor of the new parent")]
    Cycle { parent: NodeId, child: NodeId },
    /// A child list names a node the arena does not hold.
    #[error("node {parent:?} references missing child {child:?}")]
    DanglingChild { parent: NodeId, child: NodeId },
    /// The arena is full: node ids are 32 bits wide.
    #[error("syntax tree of {count} nodes exceeds the node id range")]
    TooManyNodes { count: usize },
    #[error("unsupported snapshot version {found}, expected {expected}")]
    SnapshotVersion { found: u32, expected: u32 },
}
