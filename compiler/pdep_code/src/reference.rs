//! Resolving reference nodes to types.
//!
//! A reference node's image holds the fully qualified name the parser
//! computed. `self`, `static` and `parent` resolve through the enclosing
//! declaration instead. Every resolution is memoized per node, so the
//! resolver sees each reference at most once.

use pdep_ir::{NodeId, NodeKind};

use crate::{CodeModel, TypeId};

/// Looks up a class or interface by qualified name.
pub trait TypeResolver {
    fn class_or_interface(&self, name: &str) -> Option<TypeId>;
}

impl TypeResolver for CodeModel {
    fn class_or_interface(&self, name: &str) -> Option<TypeId> {
        self.find_type(name)
    }
}

impl CodeModel {
    /// Replace the name resolver used for references not resolved yet.
    ///
    /// Clears the memo so later lookups go through `resolver`.
    pub fn set_resolver(&mut self, resolver: Box<dyn TypeResolver>) {
        self.resolver = Some(resolver);
        self.resolved.borrow_mut().clear();
    }

    /// Resolve a reference node to the type it names.
    pub fn resolve_reference(&self, node: NodeId) -> Option<TypeId> {
        if let Some(&cached) = self.resolved.borrow().get(&node) {
            return cached;
        }
        let resolved = self.resolve_uncached(node);
        self.resolved.borrow_mut().insert(node, resolved);
        resolved
    }

    fn resolve_uncached(&self, node: NodeId) -> Option<TypeId> {
        match self.ast.kind(node) {
            NodeKind::SelfReference | NodeKind::StaticReference => self.enclosing_type(node),
            NodeKind::ParentReference => {
                let host = self.enclosing_type(node)?;
                let parent = self.type_decl(host).parent_reference()?;
                self.resolve_reference(parent)
            }
            kind if kind.is_a(NodeKind::ClassOrInterfaceReference) => {
                let name = self.ast.image(node);
                let found = match &self.resolver {
                    Some(resolver) => resolver.class_or_interface(name),
                    None => self.find_type(name),
                };
                tracing::trace!(name, ?found, "resolved type reference");
                found
            }
            _ => None,
        }
    }

    /// Resolve every node in `nodes`, dropping unresolved ones.
    pub fn resolve_all(&self, nodes: &[NodeId]) -> Vec<TypeId> {
        nodes
            .iter()
            .filter_map(|&node| self.resolve_reference(node))
            .collect()
    }
}
