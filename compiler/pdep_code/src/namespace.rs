//! Namespaces and exclusive artifact ownership.

use crate::{CallableId, CodeModel, NamespaceId, TypeId};

/// Name of the namespace holding declarations outside any `namespace`.
pub const GLOBAL_NAMESPACE: &str = "+global";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Namespace {
    name: String,
    pub(crate) types: Vec<TypeId>,
    pub(crate) functions: Vec<CallableId>,
}

impl Namespace {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Namespace {
            name: name.into(),
            types: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_global(&self) -> bool {
        self.name == GLOBAL_NAMESPACE
    }

    pub fn types(&self) -> &[TypeId] {
        &self.types
    }

    pub fn functions(&self) -> &[CallableId] {
        &self.functions
    }
}

impl CodeModel {
    /// Move `ty` into `ns`, removing it from its previous namespace.
    ///
    /// Adding a type to the namespace that already owns it does nothing.
    pub fn add_type_to_namespace(&mut self, ns: NamespaceId, ty: TypeId) {
        let previous = self.types[ty.index()].namespace;
        if previous == Some(ns) {
            return;
        }
        if let Some(old) = previous {
            self.namespaces[old.index()].types.retain(|&t| t != ty);
        }
        self.namespaces[ns.index()].types.push(ty);
        let name = self.namespaces[ns.index()].name.clone();
        let decl = &mut self.types[ty.index()];
        decl.namespace = Some(ns);
        decl.namespace_name = name;
        tracing::trace!(?ty, ?ns, "type moved to namespace");
    }

    /// Detach `ty` from its namespace.
    pub fn remove_type_from_namespace(&mut self, ty: TypeId) {
        if let Some(old) = self.types[ty.index()].namespace.take() {
            self.namespaces[old.index()].types.retain(|&t| t != ty);
        }
    }

    /// Move the function `callable` into `ns`.
    pub fn add_function_to_namespace(&mut self, ns: NamespaceId, callable: CallableId) {
        let previous = self.callables[callable.index()].namespace();
        if previous == Some(ns) {
            return;
        }
        if let Some(old) = previous {
            self.namespaces[old.index()].functions.retain(|&c| c != callable);
        }
        self.namespaces[ns.index()].functions.push(callable);
        self.callables[callable.index()].set_namespace(ns);
    }

    /// A namespace is user defined when it holds at least one user-defined
    /// type or any function.
    pub fn is_user_defined_namespace(&self, ns: NamespaceId) -> bool {
        let namespace = self.namespace(ns);
        !namespace.functions.is_empty()
            || namespace
                .types
                .iter()
                .any(|&ty| self.type_decl(ty).is_user_defined())
    }
}
