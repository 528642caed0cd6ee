//! Recording artifacts while a parser walks the source.

use std::path::PathBuf;

use pdep_ir::{AstArena, NodeId, NodeKind};

use crate::types::{split_qualified, ANONYMOUS_CLASS};
use crate::{
    Callable, CallableId, CallableKind, CodeError, CodeModel, CompilationUnit, NamespaceId, TypeDecl,
    TypeId, TypeKind, UnitId,
};

/// Collects units, namespaces, types and callables into a [`CodeModel`].
///
/// Call [`CodeBuilder::finish`] once every source has been parsed: it
/// creates placeholder types for references nothing declares.
#[derive(Debug, Default)]
pub struct CodeBuilder {
    model: CodeModel,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn ast(&self) -> &AstArena {
        &self.model.ast
    }

    #[inline]
    pub fn ast_mut(&mut self) -> &mut AstArena {
        &mut self.model.ast
    }

    #[inline]
    pub fn model(&self) -> &CodeModel {
        &self.model
    }

    /// Start a compilation unit and allocate its root node.
    pub fn begin_unit(&mut self, file: Option<PathBuf>, source: Option<String>) -> Result<UnitId, CodeError> {
        let node = self.model.ast.alloc(NodeKind::CompilationUnit, "")?;
        let id = UnitId::from_len(self.model.units.len());
        let unit = CompilationUnit::new(file, source, node, self.model.units.len());
        tracing::debug!(?id, file = ?unit.file(), "begin compilation unit");
        self.model.units.push(unit);
        Ok(id)
    }

    pub fn unit(&self, id: UnitId) -> &CompilationUnit {
        self.model.unit(id)
    }

    /// Get or create a namespace.
    pub fn namespace(&mut self, name: &str) -> NamespaceId {
        self.model.namespace_or_insert(name)
    }

    pub fn register_class(&mut self, unit: Option<UnitId>, ns: NamespaceId, name: &str, node: NodeId) -> TypeId {
        self.register_type(TypeKind::Class, unit, ns, name, node)
    }

    pub fn register_interface(&mut self, unit: Option<UnitId>, ns: NamespaceId, name: &str, node: NodeId) -> TypeId {
        self.register_type(TypeKind::Interface, unit, ns, name, node)
    }

    pub fn register_trait(&mut self, unit: Option<UnitId>, ns: NamespaceId, name: &str, node: NodeId) -> TypeId {
        self.register_type(TypeKind::Trait, unit, ns, name, node)
    }

    /// Register the class of a `new class { ... }` expression.
    ///
    /// The class belongs to its unit's syntax tree only: it is not listed
    /// in `ns` or the unit and cannot be found by name.
    pub fn register_anonymous_class(&mut self, unit: Option<UnitId>, ns: NamespaceId, node: NodeId) -> TypeId {
        let ns_name = self.model.namespace(ns).name().to_owned();
        let mut decl = TypeDecl::new(TypeKind::Class, ANONYMOUS_CLASS, ns_name);
        decl.node = Some(node);
        decl.unit = unit;
        decl.user_defined = true;
        decl.anonymous = true;
        let id = TypeId::from_len(self.model.types.len());
        self.model.types.push(decl);
        self.model.index_type(id);
        tracing::debug!(?id, "registered anonymous class");
        id
    }

    fn register_type(
        &mut self,
        kind: TypeKind,
        unit: Option<UnitId>,
        ns: NamespaceId,
        name: &str,
        node: NodeId,
    ) -> TypeId {
        let ns_name = self.model.namespace(ns).name().to_owned();
        let mut decl = TypeDecl::new(kind, name, ns_name);
        decl.node = Some(node);
        decl.unit = unit;
        decl.user_defined = true;
        let id = TypeId::from_len(self.model.types.len());
        self.model.types.push(decl);
        self.model.add_type_to_namespace(ns, id);
        self.model.index_type(id);
        if let Some(unit) = unit {
            self.model.units[unit.index()].types.push(id);
        }
        tracing::debug!(%kind, name, ?id, "registered type");
        id
    }

    pub fn type_decl(&self, ty: TypeId) -> &TypeDecl {
        self.model.type_decl(ty)
    }

    pub fn type_decl_mut(&mut self, ty: TypeId) -> &mut TypeDecl {
        self.model.type_decl_mut(ty)
    }

    /// Record the `extends` reference of a class.
    pub fn set_parent_reference(&mut self, ty: TypeId, reference: NodeId) {
        self.model.types[ty.index()].parent = Some(reference);
    }

    /// Record an `implements` (class) or `extends` (interface) reference.
    pub fn add_interface_reference(&mut self, ty: TypeId, reference: NodeId) {
        self.model.types[ty.index()].interfaces.push(reference);
    }

    pub fn set_type_comment(&mut self, ty: TypeId, comment: Option<String>) {
        self.model.types[ty.index()].comment = comment;
    }

    pub fn register_method(&mut self, owner: TypeId, name: &str, node: NodeId) -> CallableId {
        let id = CallableId::from_len(self.model.callables.len());
        let mut callable = Callable::new(name, CallableKind::Method { owner }, node);
        callable.unit = self.model.type_decl(owner).unit;
        callable.cache_key = self.callable_key(callable.unit, node);
        self.model.callables.push(callable);
        self.model.types[owner.index()].methods.push(id);
        tracing::debug!(name, ?owner, ?id, "registered method");
        id
    }

    pub fn register_function(&mut self, unit: Option<UnitId>, ns: NamespaceId, name: &str, node: NodeId) -> CallableId {
        let id = CallableId::from_len(self.model.callables.len());
        let mut callable = Callable::new(name, CallableKind::Function { namespace: None }, node);
        callable.unit = unit;
        callable.cache_key = self.callable_key(unit, node);
        self.model.callables.push(callable);
        self.model.add_function_to_namespace(ns, id);
        if let Some(unit) = unit {
            self.model.units[unit.index()].functions.push(id);
        }
        tracing::debug!(name, ?id, "registered function");
        id
    }

    fn callable_key(&self, unit: Option<UnitId>, node: NodeId) -> String {
        match unit {
            Some(unit) => format!("{}#{}", self.model.unit(unit).id(), node.raw()),
            None => format!("callable-{}", node.raw()),
        }
    }

    pub fn callable(&self, id: CallableId) -> &Callable {
        self.model.callable(id)
    }

    pub fn callable_mut(&mut self, id: CallableId) -> &mut Callable {
        self.model.callable_mut(id)
    }

    pub fn set_return_type(&mut self, callable: CallableId, node: NodeId) {
        self.model.callables[callable.index()].return_type = Some(node);
    }

    pub fn add_exception_reference(&mut self, callable: CallableId, node: NodeId) {
        self.model.callables[callable.index()].exceptions.push(node);
    }

    pub fn set_returns_reference(&mut self, callable: CallableId, by_ref: bool) {
        self.model.callables[callable.index()].returns_reference = by_ref;
    }

    pub fn set_callable_comment(&mut self, callable: CallableId, comment: Option<String>) {
        self.model.callables[callable.index()].comment = comment;
    }

    /// Finish building: create placeholders for unresolved references.
    #[tracing::instrument(level = "debug", skip_all, fields(types = self.model.types.len()))]
    pub fn finish(mut self) -> CodeModel {
        let references: Vec<(NodeKind, String)> = self
            .model
            .ast
            .iter()
            .filter(|(_, node)| {
                node.kind.is_a(NodeKind::ClassOrInterfaceReference)
                    && !matches!(
                        node.kind,
                        NodeKind::SelfReference | NodeKind::ParentReference | NodeKind::StaticReference
                    )
            })
            .map(|(_, node)| (node.kind, node.image.clone()))
            .collect();

        for (kind, image) in references {
            if image.is_empty() || self.model.find_type(&image).is_some() {
                continue;
            }
            let (ns_name, local) = split_qualified(&image);
            let type_kind = if kind == NodeKind::TraitReference {
                TypeKind::Trait
            } else {
                TypeKind::Class
            };
            let ns = self.model.namespace_or_insert(ns_name);
            let ns_name = self.model.namespace(ns).name().to_owned();
            let id = TypeId::from_len(self.model.types.len());
            self.model.types.push(TypeDecl::new(type_kind, local, ns_name));
            self.model.add_type_to_namespace(ns, id);
            self.model.index_type(id);
            tracing::debug!(name = %image, ?id, "created placeholder type");
        }
        self.model.resolved.borrow_mut().clear();
        self.model
    }
}
