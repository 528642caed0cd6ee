use std::ops::{Index, IndexMut};

use super::{AstNode, NodeId, NodeKind};
use crate::{AstError, SourceRange, Span};

/// Flat storage for every node of one or more syntax trees.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct AstArena {
    nodes: Vec<AstNode>,
}

impl AstArena {
    pub fn new() -> Self {
        AstArena { nodes: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node.
    ///
    /// Fails once the arena holds `u32::MAX` nodes.
    pub fn alloc(&mut self, kind: NodeKind, image: impl Into<String>) -> Result<NodeId, AstError> {
        let count = self.nodes.len();
        let index = u32::try_from(count)
            .ok()
            .filter(|&index| index < u32::MAX)
            .ok_or(AstError::TooManyNodes { count })?;
        self.nodes.push(AstNode::new(kind, image.into()));
        Ok(NodeId::new(index))
    }

    /// Allocate a detached node with its source position.
    pub fn alloc_at(
        &mut self,
        kind: NodeKind,
        image: impl Into<String>,
        span: Span,
        range: SourceRange,
    ) -> Result<NodeId, AstError> {
        let id = self.alloc(kind, image)?;
        self.set_position(id, span, range);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut AstNode {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    #[inline]
    pub fn image(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].image
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn set_position(&mut self, id: NodeId, span: Span, range: SourceRange) {
        let node = self.get_mut(id);
        node.span = span;
        node.range = range;
    }

    /// The child at `index`.
    pub fn child(&self, id: NodeId, index: usize) -> Result<NodeId, AstError> {
        let node = self.get(id);
        node.children
            .get(index)
            .copied()
            .ok_or(AstError::ChildOutOfBounds {
                index,
                len: node.children.len(),
                kind: node.kind,
            })
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), AstError> {
        self.check_acyclic(parent, child)?;
        self.detach(child);
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), AstError> {
        self.check_acyclic(parent, child)?;
        self.detach(child);
        self.nodes[parent.index()].children.insert(0, child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Remove `child` from its parent's child list.
    pub fn detach(&mut self, child: NodeId) {
        if let Some(old) = self.nodes[child.index()].parent.take() {
            self.nodes[old.index()].children.retain(|&c| c != child);
        }
    }

    fn check_acyclic(&self, parent: NodeId, child: NodeId) -> Result<(), AstError> {
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return Err(AstError::Cycle { parent, child });
            }
            current = self.parent(id);
        }
        Ok(())
    }

    /// First descendant of `id` that is a `kind`, depth-first pre-order.
    pub fn first_child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let node = self.get(current);
            if node.kind.is_a(kind) {
                return Some(current);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Every descendant of `id` that is a `kind`, depth-first pre-order.
    pub fn find_children_of_kind(&self, id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&node| self.kind(node).is_a(kind))
            .collect()
    }

    /// All descendants of `id` in depth-first pre-order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Ancestors of `id` that are a `kind`, outermost first.
    pub fn parents_of_kind(&self, id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        let mut parents: Vec<NodeId> = self
            .ancestors(id)
            .filter(|&ancestor| self.kind(ancestor).is_a(kind))
            .collect();
        parents.reverse();
        parents
    }

    /// Nearest ancestor of `id` that is a `kind`.
    pub fn parent_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.ancestors(id)
            .find(|&ancestor| self.kind(ancestor).is_a(kind))
    }

    /// Topmost ancestor of `id`, or `id` itself when detached.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Rebuild every parent link from the child lists.
    ///
    /// Required after deserializing an arena since parent links are not
    /// persisted.
    pub fn relink(&mut self) -> Result<(), AstError> {
        let count = u32::try_from(self.nodes.len())
            .map_err(|_| AstError::TooManyNodes { count: self.nodes.len() })?;
        for node in &mut self.nodes {
            node.parent = None;
        }
        for parent in (0..count).map(NodeId::new) {
            let index = parent.index();
            for child_pos in 0..self.nodes[index].children.len() {
                let child = self.nodes[index].children[child_pos];
                if !self.contains(child) {
                    return Err(AstError::DanglingChild { parent, child });
                }
                self.nodes[child.index()].parent = Some(parent);
            }
        }
        tracing::trace!(nodes = self.nodes.len(), "relinked syntax tree");
        Ok(())
    }

    /// Every node with its id, in allocation order.
    ///
    /// Ids are handed out by [`alloc`](Self::alloc), which keeps every index
    /// within `u32`.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &AstNode)> {
        (0..=u32::MAX).map(NodeId::new).zip(&self.nodes)
    }
}

impl Index<NodeId> for AstArena {
    type Output = AstNode;

    #[inline]
    fn index(&self, id: NodeId) -> &AstNode {
        self.get(id)
    }
}

impl IndexMut<NodeId> for AstArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut AstNode {
        self.get_mut(id)
    }
}
