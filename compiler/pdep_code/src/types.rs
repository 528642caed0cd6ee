//! Classes, interfaces and traits.

use std::fmt;

use pdep_ir::{DeclarationKind, ModifierError, ModifierSlot, Modifiers, NodeId};

use crate::namespace::GLOBAL_NAMESPACE;
use crate::{CallableId, NamespaceId, UnitId};

/// Name given to every `new class { ... }` declaration.
pub const ANONYMOUS_CLASS: &str = "class@anonymous";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Trait,
}

impl TypeKind {
    pub const fn declaration_kind(self) -> DeclarationKind {
        match self {
            TypeKind::Class => DeclarationKind::Class,
            TypeKind::Interface => DeclarationKind::Interface,
            TypeKind::Trait => DeclarationKind::Trait,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Trait => "trait",
        })
    }
}

/// A class, interface or trait declaration.
///
/// Placeholders for referenced but never declared types have no node and
/// report `is_user_defined() == false`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypeDecl {
    name: String,
    kind: TypeKind,
    modifiers: ModifierSlot,
    pub(crate) namespace: Option<NamespaceId>,
    pub(crate) namespace_name: String,
    pub(crate) node: Option<NodeId>,
    pub(crate) unit: Option<UnitId>,
    /// `extends` reference of a class.
    pub(crate) parent: Option<NodeId>,
    /// `implements` references of a class, `extends` references of an interface.
    pub(crate) interfaces: Vec<NodeId>,
    pub(crate) methods: Vec<CallableId>,
    pub(crate) user_defined: bool,
    /// `new class { ... }`; never indexed by name or listed in a namespace.
    pub(crate) anonymous: bool,
    pub(crate) comment: Option<String>,
}

impl TypeDecl {
    pub(crate) fn new(kind: TypeKind, name: impl Into<String>, namespace_name: impl Into<String>) -> Self {
        let modifiers = match kind {
            TypeKind::Interface => ModifierSlot::fixed(Modifiers::IMPLICIT_ABSTRACT),
            TypeKind::Class | TypeKind::Trait => ModifierSlot::default(),
        };
        TypeDecl {
            name: name.into(),
            kind,
            modifiers,
            namespace: None,
            namespace_name: namespace_name.into(),
            node: None,
            unit: None,
            parent: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            user_defined: false,
            anonymous: false,
            comment: None,
        }
    }

    /// Unqualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace-qualified name without a leading backslash.
    pub fn qualified_name(&self) -> String {
        qualify(&self.namespace_name, &self.name)
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_trait(&self) -> bool {
        self.kind == TypeKind::Trait
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers.get()
    }

    /// Assign the declaration modifiers; allowed exactly once.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) -> Result<(), ModifierError> {
        self.modifiers.assign(self.kind.declaration_kind(), modifiers)
    }

    /// Interfaces are always abstract.
    pub fn is_abstract(&self) -> bool {
        self.modifiers.get().is_abstract()
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.get().is_final()
    }

    pub fn namespace(&self) -> Option<NamespaceId> {
        self.namespace
    }

    pub fn namespace_name(&self) -> &str {
        &self.namespace_name
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn unit(&self) -> Option<UnitId> {
        self.unit
    }

    pub fn parent_reference(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn interface_references(&self) -> &[NodeId] {
        &self.interfaces
    }

    /// Methods declared in this type's body.
    pub fn methods(&self) -> &[CallableId] {
        &self.methods
    }

    pub fn is_user_defined(&self) -> bool {
        self.user_defined
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// Join a namespace and a local name.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() || namespace == GLOBAL_NAMESPACE {
        name.to_owned()
    } else {
        format!("{namespace}\\{name}")
    }
}

/// Split a qualified name into namespace and local name.
pub fn split_qualified(name: &str) -> (&str, &str) {
    let name = name.trim_start_matches('\\');
    match name.rfind('\\') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => (GLOBAL_NAMESPACE, name),
    }
}
