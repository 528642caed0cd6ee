//! The code model: every unit, namespace, type and callable of an analysis.

use std::cell::RefCell;
use std::fmt;

use pdep_ir::{AstArena, NodeId};
use rustc_hash::FxHashMap;

use crate::filter::ArtifactFilter;
use crate::reference::TypeResolver;
use crate::{
    Callable, CallableId, CompilationUnit, Namespace, NamespaceId, TypeDecl, TypeId, UnitId,
};

/// Owner of the syntax trees and all code artifacts built from them.
///
/// Artifacts refer to each other by id, so sharing (two classes extending
/// the same parent) is identity, not structural equality.
pub struct CodeModel {
    pub(crate) ast: AstArena,
    pub(crate) units: Vec<CompilationUnit>,
    pub(crate) namespaces: Vec<Namespace>,
    pub(crate) types: Vec<TypeDecl>,
    pub(crate) callables: Vec<Callable>,

    /// Lower-cased qualified name to type.
    pub(crate) type_index: FxHashMap<String, TypeId>,
    /// Lower-cased namespace name to namespace.
    pub(crate) namespace_index: FxHashMap<String, NamespaceId>,
    /// Declaration node to type.
    pub(crate) type_nodes: FxHashMap<NodeId, TypeId>,

    /// Memoized reference resolution.
    pub(crate) resolved: RefCell<FxHashMap<NodeId, Option<TypeId>>>,
    pub(crate) resolver: Option<Box<dyn TypeResolver>>,
}

impl CodeModel {
    pub fn new() -> Self {
        CodeModel {
            ast: AstArena::new(),
            units: Vec::new(),
            namespaces: Vec::new(),
            types: Vec::new(),
            callables: Vec::new(),
            type_index: FxHashMap::default(),
            namespace_index: FxHashMap::default(),
            type_nodes: FxHashMap::default(),
            resolved: RefCell::new(FxHashMap::default()),
            resolver: None,
        }
    }

    #[inline]
    pub fn ast(&self) -> &AstArena {
        &self.ast
    }

    #[inline]
    pub fn ast_mut(&mut self) -> &mut AstArena {
        &mut self.ast
    }

    // === Units ===

    pub fn unit(&self, id: UnitId) -> &CompilationUnit {
        &self.units[id.index()]
    }

    pub fn units(&self) -> impl Iterator<Item = (UnitId, &CompilationUnit)> {
        self.units
            .iter()
            .enumerate()
            .map(|(i, unit)| (UnitId::from_len(i), unit))
    }

    // === Namespaces ===

    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.index()]
    }

    pub fn namespaces(&self) -> impl Iterator<Item = (NamespaceId, &Namespace)> {
        self.namespaces
            .iter()
            .enumerate()
            .map(|(i, ns)| (NamespaceId::from_len(i), ns))
    }

    /// Namespace by name, case-insensitive.
    pub fn find_namespace(&self, name: &str) -> Option<NamespaceId> {
        self.namespace_index.get(&name.to_lowercase()).copied()
    }

    /// Get or create the namespace `name`.
    pub fn namespace_or_insert(&mut self, name: &str) -> NamespaceId {
        let key = name.to_lowercase();
        if let Some(&id) = self.namespace_index.get(&key) {
            return id;
        }
        let id = NamespaceId::from_len(self.namespaces.len());
        self.namespaces.push(Namespace::new(name));
        self.namespace_index.insert(key, id);
        tracing::debug!(name, ?id, "created namespace");
        id
    }

    /// Namespaces accepted by `filter` that hold user-defined artifacts,
    /// in creation order.
    pub fn filtered_namespaces(&self, filter: &dyn ArtifactFilter) -> Vec<NamespaceId> {
        self.namespaces()
            .filter(|(id, ns)| filter.accept_namespace(ns.name()) && self.is_user_defined_namespace(*id))
            .map(|(id, _)| id)
            .collect()
    }

    /// Types of `ns` accepted by `filter`.
    pub fn filtered_types(&self, ns: NamespaceId, filter: &dyn ArtifactFilter) -> Vec<TypeId> {
        self.namespace(ns)
            .types()
            .iter()
            .copied()
            .filter(|&ty| filter.accept_type(self, ty))
            .collect()
    }

    // === Types ===

    pub fn type_decl(&self, id: TypeId) -> &TypeDecl {
        &self.types[id.index()]
    }

    pub fn type_decl_mut(&mut self, id: TypeId) -> &mut TypeDecl {
        &mut self.types[id.index()]
    }

    pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeDecl)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, ty)| (TypeId::from_len(i), ty))
    }

    /// Type by qualified name, case-insensitive, leading backslash optional.
    pub fn find_type(&self, name: &str) -> Option<TypeId> {
        self.type_index
            .get(&name.trim_start_matches('\\').to_lowercase())
            .copied()
    }

    /// Type declared by the node `node`.
    pub fn type_of_node(&self, node: NodeId) -> Option<TypeId> {
        self.type_nodes.get(&node).copied()
    }

    /// Nearest type declaration enclosing `node`.
    pub fn enclosing_type(&self, node: NodeId) -> Option<TypeId> {
        if let Some(ty) = self.type_of_node(node) {
            return Some(ty);
        }
        self.ast
            .ancestors(node)
            .find_map(|ancestor| self.type_of_node(ancestor))
    }

    // === Callables ===

    pub fn callable(&self, id: CallableId) -> &Callable {
        &self.callables[id.index()]
    }

    pub fn callable_mut(&mut self, id: CallableId) -> &mut Callable {
        &mut self.callables[id.index()]
    }

    pub fn callables(&self) -> impl Iterator<Item = (CallableId, &Callable)> {
        self.callables
            .iter()
            .enumerate()
            .map(|(i, c)| (CallableId::from_len(i), c))
    }

    /// Method `name` declared directly in `ty`, case-insensitive.
    pub fn find_own_method(&self, ty: TypeId, name: &str) -> Option<CallableId> {
        self.type_decl(ty)
            .methods()
            .iter()
            .copied()
            .find(|&m| self.callable(m).name().eq_ignore_ascii_case(name))
    }

    /// Function by qualified name, case-insensitive.
    pub fn find_function(&self, name: &str) -> Option<CallableId> {
        let (ns, local) = crate::types::split_qualified(name);
        let ns = self.find_namespace(ns)?;
        self.namespace(ns)
            .functions()
            .iter()
            .copied()
            .find(|&f| self.callable(f).name().eq_ignore_ascii_case(local))
    }

    pub(crate) fn rebuild_indexes(&mut self) {
        self.type_index.clear();
        self.namespace_index.clear();
        self.type_nodes.clear();
        for (i, ns) in self.namespaces.iter().enumerate() {
            self.namespace_index
                .insert(ns.name().to_lowercase(), NamespaceId::from_len(i));
        }
        for i in 0..self.types.len() {
            self.index_type(TypeId::from_len(i));
        }
        self.resolved.borrow_mut().clear();
    }

    /// Add `ty` to the name index. User-defined declarations replace
    /// placeholders; otherwise the first declaration wins.
    pub(crate) fn index_type(&mut self, ty: TypeId) {
        let decl = &self.types[ty.index()];
        if let Some(node) = decl.node {
            self.type_nodes.insert(node, ty);
        }
        if decl.anonymous {
            return;
        }
        let key = decl.qualified_name().to_lowercase();
        let user_defined = decl.user_defined;
        match self.type_index.get(&key) {
            Some(&existing) if self.types[existing.index()].user_defined || !user_defined => {
                tracing::debug!(name = %key, "keeping earlier declaration");
            }
            _ => {
                self.type_index.insert(key, ty);
            }
        }
    }
}

impl Default for CodeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CodeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeModel")
            .field("nodes", &self.ast.len())
            .field("units", &self.units.len())
            .field("namespaces", &self.namespaces.len())
            .field("types", &self.types.len())
            .field("callables", &self.callables.len())
            .field("custom_resolver", &self.resolver.is_some())
            .finish_non_exhaustive()
    }
}
