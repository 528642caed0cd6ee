//! Types an artifact depends on.

use pdep_ir::visitor::walk_node;
use pdep_ir::{AstArena, NodeId, NodeKind, Visitor};
use rustc_hash::FxHashSet;

use crate::{CallableId, CodeModel, TypeId};

/// Collects every class reference below a node.
#[derive(Default)]
struct ReferenceCollector {
    references: Vec<NodeId>,
}

impl<'ast> Visitor<'ast> for ReferenceCollector {
    fn visit_type_reference(&mut self, id: NodeId, arena: &'ast AstArena) {
        self.references.push(id);
        walk_node(self, id, arena);
    }
}

impl CodeModel {
    fn collect_references(&self, root: NodeId, collector: &mut ReferenceCollector) {
        collector.visit_node(root, &self.ast);
    }

    fn unique_types(&self, references: &[NodeId], exclude: Option<TypeId>) -> Vec<TypeId> {
        let mut seen = FxHashSet::default();
        self.resolve_all(references)
            .into_iter()
            .filter(|&ty| Some(ty) != exclude && seen.insert(ty))
            .collect()
    }

    /// Types referenced by a callable's signature, annotations and body,
    /// excluding the owner of a method.
    pub fn callable_dependencies(&self, callable: CallableId) -> Vec<TypeId> {
        let decl = self.callable(callable);
        let mut collector = ReferenceCollector::default();
        self.collect_references(decl.node(), &mut collector);
        if let Some(ret) = decl.return_type() {
            if self.ast.parent(ret).is_none() {
                self.collect_references(ret, &mut collector);
            }
        }
        for &exception in decl.exception_references() {
            self.collect_references(exception, &mut collector);
        }
        self.unique_types(&collector.references, decl.owner())
    }

    /// Types referenced anywhere in a type declaration, excluding itself.
    pub fn type_dependencies(&self, ty: TypeId) -> Vec<TypeId> {
        let decl = self.type_decl(ty);
        let Some(node) = decl.node() else {
            return Vec::new();
        };
        let mut collector = ReferenceCollector::default();
        self.collect_references(node, &mut collector);
        for &method in decl.methods() {
            let callable = self.callable(method);
            if let Some(ret) = callable.return_type() {
                if self.ast.parent(ret).is_none() {
                    self.collect_references(ret, &mut collector);
                }
            }
            for &exception in callable.exception_references() {
                self.collect_references(exception, &mut collector);
            }
        }
        collector
            .references
            .retain(|&r| !matches!(self.ast.kind(r), NodeKind::SelfReference | NodeKind::StaticReference));
        self.unique_types(&collector.references, Some(ty))
    }
}
