//! Syntax tree visitor.
//!
//! Default methods call `walk_node`, which visits the children in order.
//! Override a `visit_*` hook to react to a family of nodes; call
//! [`walk_node`] from the override to keep descending.
//!
//! ```text
//! struct CountVariables(usize);
//!
//! impl<'ast> Visitor<'ast> for CountVariables {
//!     fn visit_variable(&mut self, id: NodeId, arena: &'ast AstArena) {
//!         self.0 += 1;
//!         walk_node(self, id, arena);
//!     }
//! }
//! ```

use crate::ast::{AstArena, NodeId, NodeKind};

pub trait Visitor<'ast> {
    /// Entry point for every node; dispatches on the node kind.
    fn visit_node(&mut self, id: NodeId, arena: &'ast AstArena) {
        dispatch(self, id, arena);
    }

    /// Class, interface, trait, `self`, `parent` and `static` references.
    fn visit_type_reference(&mut self, id: NodeId, arena: &'ast AstArena) {
        walk_node(self, id, arena);
    }

    /// Scalar, array, callable, nullable and union type hints.
    fn visit_type_hint(&mut self, id: NodeId, arena: &'ast AstArena) {
        walk_node(self, id, arena);
    }

    /// `$name`, `${expr}` and `$$name`.
    fn visit_variable(&mut self, id: NodeId, arena: &'ast AstArena) {
        walk_node(self, id, arena);
    }

    /// Function and method calls.
    fn visit_invocation(&mut self, id: NodeId, arena: &'ast AstArena) {
        walk_node(self, id, arena);
    }

    fn visit_allocation(&mut self, id: NodeId, arena: &'ast AstArena) {
        walk_node(self, id, arena);
    }

    fn visit_closure(&mut self, id: NodeId, arena: &'ast AstArena) {
        walk_node(self, id, arena);
    }

    fn visit_literal(&mut self, id: NodeId, arena: &'ast AstArena) {
        walk_node(self, id, arena);
    }

    /// Any node without a dedicated hook.
    fn visit_other(&mut self, id: NodeId, arena: &'ast AstArena) {
        walk_node(self, id, arena);
    }
}

/// Route `id` to the hook for its kind.
pub fn dispatch<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, id: NodeId, arena: &'ast AstArena) {
    let kind = arena.kind(id);
    if kind.is_a(NodeKind::ClassOrInterfaceReference) {
        return visitor.visit_type_reference(id, arena);
    }
    if kind.is_a(NodeKind::Type) {
        return visitor.visit_type_hint(id, arena);
    }
    match kind {
        NodeKind::Variable | NodeKind::CompoundVariable | NodeKind::VariableVariable => {
            visitor.visit_variable(id, arena);
        }
        NodeKind::FunctionPostfix | NodeKind::MethodPostfix => visitor.visit_invocation(id, arena),
        NodeKind::AllocationExpression => visitor.visit_allocation(id, arena),
        NodeKind::Closure => visitor.visit_closure(id, arena),
        NodeKind::Literal => visitor.visit_literal(id, arena),
        _ => visitor.visit_other(id, arena),
    }
}

/// Visit every child of `id` in order.
pub fn walk_node<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, id: NodeId, arena: &'ast AstArena) {
    for &child in arena.children(id) {
        visitor.visit_node(child, arena);
    }
}
