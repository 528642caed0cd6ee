//! Inheritance queries.
//!
//! Every walk over `extends`/`implements` edges tracks the current path and
//! fails with [`CodeError::RecursiveInheritance`] when a type reappears on
//! it, so a cyclic declaration can never loop.

use std::collections::BTreeMap;

use pdep_ir::Modifiers;
use rustc_hash::FxHashSet;

use crate::{CallableId, CodeError, CodeModel, TypeId, TypeKind};

/// A method as seen from a type after inheritance and trait composition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedMethod {
    pub callable: CallableId,
    /// Name under which the method is reachable (an alias for renamed
    /// trait methods).
    pub name: String,
    /// Effective modifiers, including a visibility changed by an alias.
    pub modifiers: Modifiers,
    /// Type declaring the method body.
    pub origin: TypeId,
}

impl ResolvedMethod {
    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract()
    }
}

/// Methods keyed by lower-cased name.
pub type MethodMap = BTreeMap<String, ResolvedMethod>;

impl CodeModel {
    pub(crate) fn recursive(&self, ty: TypeId) -> CodeError {
        CodeError::RecursiveInheritance {
            name: self.type_decl(ty).qualified_name(),
        }
    }

    /// The class named in `extends`, if it resolves.
    pub fn parent_class(&self, ty: TypeId) -> Option<TypeId> {
        let decl = self.type_decl(ty);
        if decl.kind() != TypeKind::Class {
            return None;
        }
        self.resolve_reference(decl.parent_reference()?)
    }

    /// The `extends` chain from the direct parent upwards.
    pub fn parent_classes(&self, ty: TypeId) -> Result<Vec<TypeId>, CodeError> {
        let mut chain = Vec::new();
        let mut current = ty;
        while let Some(parent) = self.parent_class(current) {
            if parent == ty || chain.contains(&parent) {
                return Err(self.recursive(parent));
            }
            chain.push(parent);
            current = parent;
        }
        Ok(chain)
    }

    /// Direct supertypes: interfaces first, then the parent class.
    fn direct_supertypes(&self, ty: TypeId) -> Vec<TypeId> {
        let decl = self.type_decl(ty);
        let mut out = self.resolve_all(decl.interface_references());
        if let Some(parent) = self.parent_class(ty) {
            out.push(parent);
        }
        out
    }

    /// `ty` and every type it extends or implements, depth first.
    pub fn supertypes(&self, ty: TypeId) -> Result<Vec<TypeId>, CodeError> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut path = Vec::new();
        self.collect_supertypes(ty, &mut path, &mut seen, &mut out)?;
        Ok(out)
    }

    fn collect_supertypes(
        &self,
        ty: TypeId,
        path: &mut Vec<TypeId>,
        seen: &mut FxHashSet<TypeId>,
        out: &mut Vec<TypeId>,
    ) -> Result<(), CodeError> {
        if path.contains(&ty) {
            return Err(self.recursive(ty));
        }
        if !seen.insert(ty) {
            return Ok(());
        }
        out.push(ty);
        path.push(ty);
        for sup in self.direct_supertypes(ty) {
            self.collect_supertypes(sup, path, seen, out)?;
        }
        path.pop();
        Ok(())
    }

    /// Every interface `ty` implements or extends, directly or through a
    /// parent class or parent interface.
    pub fn interfaces(&self, ty: TypeId) -> Result<Vec<TypeId>, CodeError> {
        Ok(self
            .supertypes(ty)?
            .into_iter()
            .filter(|&sup| sup != ty && self.type_decl(sup).is_interface())
            .collect())
    }

    /// Reflexive, transitive subtype check over extends and implements.
    pub fn is_subtype_of(&self, ty: TypeId, other: TypeId) -> Result<bool, CodeError> {
        if ty == other {
            return Ok(true);
        }
        Ok(self.supertypes(ty)?.contains(&other))
    }

    /// Every method reachable on `ty`.
    ///
    /// Own methods win over trait methods, and both win over inherited
    /// ones. Interfaces include the methods of the interfaces they extend.
    pub fn all_methods(&self, ty: TypeId) -> Result<MethodMap, CodeError> {
        self.all_methods_inner(ty, &mut Vec::new())
    }

    pub(crate) fn all_methods_inner(&self, ty: TypeId, path: &mut Vec<TypeId>) -> Result<MethodMap, CodeError> {
        if path.contains(&ty) {
            return Err(self.recursive(ty));
        }
        path.push(ty);

        let mut methods = self.trait_methods_inner(ty, path)?;
        for (key, method) in self.own_methods(ty) {
            methods.insert(key, method);
        }

        let decl = self.type_decl(ty);
        let inherited = match decl.kind() {
            TypeKind::Class => self.parent_class(ty).into_iter().collect(),
            TypeKind::Interface => self.resolve_all(decl.interface_references()),
            TypeKind::Trait => Vec::new(),
        };
        for sup in inherited {
            for (key, method) in self.all_methods_inner(sup, path)? {
                methods.entry(key).or_insert(method);
            }
        }

        path.pop();
        Ok(methods)
    }

    pub(crate) fn own_methods(&self, ty: TypeId) -> impl Iterator<Item = (String, ResolvedMethod)> + '_ {
        self.type_decl(ty).methods().iter().map(move |&id| {
            let callable = self.callable(id);
            (
                callable.name().to_lowercase(),
                ResolvedMethod {
                    callable: id,
                    name: callable.name().to_owned(),
                    modifiers: callable.modifiers(),
                    origin: ty,
                },
            )
        })
    }
}
