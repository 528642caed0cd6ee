//! Methods and functions.

use pdep_ir::{DeclarationKind, ModifierError, ModifierSlot, Modifiers, NodeId, Token};

use crate::cache::TokenCache;
use crate::{NamespaceId, TypeId, UnitId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CallableKind {
    Method { owner: TypeId },
    Function { namespace: Option<NamespaceId> },
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Callable {
    name: String,
    kind: CallableKind,
    modifiers: ModifierSlot,
    pub(crate) node: NodeId,
    pub(crate) unit: Option<UnitId>,
    /// Return type node: a declared hint or an `@return` annotation.
    pub(crate) return_type: Option<NodeId>,
    /// `@throws` annotation references.
    pub(crate) exceptions: Vec<NodeId>,
    pub(crate) returns_reference: bool,
    pub(crate) comment: Option<String>,
    pub(crate) cache_key: String,
}

impl Callable {
    pub(crate) fn new(name: impl Into<String>, kind: CallableKind, node: NodeId) -> Self {
        Callable {
            name: name.into(),
            kind,
            modifiers: ModifierSlot::default(),
            node,
            unit: None,
            return_type: None,
            exceptions: Vec::new(),
            returns_reference: false,
            comment: None,
            cache_key: format!("callable-{}", node.raw()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CallableKind {
        self.kind
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, CallableKind::Method { .. })
    }

    pub fn owner(&self) -> Option<TypeId> {
        match self.kind {
            CallableKind::Method { owner } => Some(owner),
            CallableKind::Function { .. } => None,
        }
    }

    pub fn namespace(&self) -> Option<NamespaceId> {
        match self.kind {
            CallableKind::Function { namespace } => namespace,
            CallableKind::Method { .. } => None,
        }
    }

    pub(crate) fn set_namespace(&mut self, ns: NamespaceId) {
        if let CallableKind::Function { namespace } = &mut self.kind {
            *namespace = Some(ns);
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers.get()
    }

    /// Assign method modifiers; allowed exactly once.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) -> Result<(), ModifierError> {
        self.modifiers.assign(DeclarationKind::Method, modifiers)
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.get().is_abstract()
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.get().is_static()
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn unit(&self) -> Option<UnitId> {
        self.unit
    }

    pub fn return_type(&self) -> Option<NodeId> {
        self.return_type
    }

    pub fn exception_references(&self) -> &[NodeId] {
        &self.exceptions
    }

    pub fn returns_reference(&self) -> bool {
        self.returns_reference
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Key of this callable's entry in the token cache.
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// Tokens of the declaration; empty when the cache holds none.
    pub fn tokens(&self, cache: &dyn TokenCache) -> Vec<Token> {
        cache.restore_tokens(&self.cache_key)
    }
}
