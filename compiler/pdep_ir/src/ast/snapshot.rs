//! Owned, arena-independent copies of a subtree.
//!
//! A snapshot keeps only what a node persists: kind, image, position,
//! comment, metadata and children. Parent links are rebuilt on restore.

use super::{AstArena, NodeId, NodeKind, NodeMetadata};
use crate::{AstError, SourceRange, Span};

/// Bump when the persisted node layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSnapshot {
    pub kind: NodeKind,
    pub image: String,
    pub span: Span,
    pub range: SourceRange,
    pub comment: Option<String>,
    pub metadata: NodeMetadata,
    pub children: Vec<NodeSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeSnapshot {
    pub version: u32,
    pub root: NodeSnapshot,
}

impl AstArena {
    /// Copy the subtree rooted at `id`.
    pub fn snapshot(&self, id: NodeId) -> TreeSnapshot {
        TreeSnapshot {
            version: SNAPSHOT_VERSION,
            root: self.snapshot_node(id),
        }
    }

    fn snapshot_node(&self, id: NodeId) -> NodeSnapshot {
        let node = self.get(id);
        NodeSnapshot {
            kind: node.kind,
            image: node.image.clone(),
            span: node.span,
            range: node.range,
            comment: node.comment.clone(),
            metadata: node.metadata.clone(),
            children: node
                .children
                .iter()
                .map(|&child| self.snapshot_node(child))
                .collect(),
        }
    }

    /// Allocate a detached copy of `snapshot` and return its root.
    pub fn restore(&mut self, snapshot: &TreeSnapshot) -> Result<NodeId, AstError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(AstError::SnapshotVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        let root = self.restore_node(&snapshot.root)?;
        let mut pending = vec![(root, &snapshot.root)];
        while let Some((parent, node)) = pending.pop() {
            for child in &node.children {
                let id = self.restore_node(child)?;
                self.add_child(parent, id)?;
                pending.push((id, child));
            }
        }
        Ok(root)
    }

    fn restore_node(&mut self, node: &NodeSnapshot) -> Result<NodeId, AstError> {
        let id = self.alloc_at(node.kind, node.image.clone(), node.span, node.range)?;
        let restored = self.get_mut(id);
        restored.comment.clone_from(&node.comment);
        restored.metadata = node.metadata.clone();
        Ok(id)
    }
}
