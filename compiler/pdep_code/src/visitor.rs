//! Visiting code artifacts.
//!
//! Each `visit_*` method returns the visitor's `Output`, so a visitor can
//! observe (`Output = ()`) or compute (`Output = usize`, a report line, ...).
//! `accept_*` dispatches on the artifact kind and hands the result back.

use crate::{CallableId, CodeModel, NamespaceId, Property, TypeId, TypeKind, UnitId};

pub trait CodeVisitor {
    type Output: Default;

    fn visit_compilation_unit(&mut self, _model: &CodeModel, _unit: UnitId) -> Self::Output {
        Self::Output::default()
    }

    fn visit_namespace(&mut self, _model: &CodeModel, _ns: NamespaceId) -> Self::Output {
        Self::Output::default()
    }

    fn visit_class(&mut self, _model: &CodeModel, _ty: TypeId) -> Self::Output {
        Self::Output::default()
    }

    fn visit_interface(&mut self, _model: &CodeModel, _ty: TypeId) -> Self::Output {
        Self::Output::default()
    }

    fn visit_trait(&mut self, _model: &CodeModel, _ty: TypeId) -> Self::Output {
        Self::Output::default()
    }

    fn visit_method(&mut self, _model: &CodeModel, _method: CallableId) -> Self::Output {
        Self::Output::default()
    }

    fn visit_function(&mut self, _model: &CodeModel, _function: CallableId) -> Self::Output {
        Self::Output::default()
    }

    fn visit_property(&mut self, _model: &CodeModel, _property: &Property) -> Self::Output {
        Self::Output::default()
    }
}

impl CodeModel {
    pub fn accept_unit<V: CodeVisitor + ?Sized>(&self, unit: UnitId, visitor: &mut V) -> V::Output {
        visitor.visit_compilation_unit(self, unit)
    }

    pub fn accept_namespace<V: CodeVisitor + ?Sized>(&self, ns: NamespaceId, visitor: &mut V) -> V::Output {
        visitor.visit_namespace(self, ns)
    }

    pub fn accept_type<V: CodeVisitor + ?Sized>(&self, ty: TypeId, visitor: &mut V) -> V::Output {
        match self.type_decl(ty).kind() {
            TypeKind::Class => visitor.visit_class(self, ty),
            TypeKind::Interface => visitor.visit_interface(self, ty),
            TypeKind::Trait => visitor.visit_trait(self, ty),
        }
    }

    pub fn accept_callable<V: CodeVisitor + ?Sized>(&self, callable: CallableId, visitor: &mut V) -> V::Output {
        if self.callable(callable).is_method() {
            visitor.visit_method(self, callable)
        } else {
            visitor.visit_function(self, callable)
        }
    }

    pub fn accept_property<V: CodeVisitor + ?Sized>(&self, property: &Property, visitor: &mut V) -> V::Output {
        visitor.visit_property(self, property)
    }
}

/// Visit the types, then the functions of `ns`, collecting the outputs.
pub fn walk_namespace<V: CodeVisitor + ?Sized>(model: &CodeModel, ns: NamespaceId, visitor: &mut V) -> Vec<V::Output> {
    let namespace = model.namespace(ns);
    let mut out: Vec<V::Output> = namespace
        .types()
        .iter()
        .map(|&ty| model.accept_type(ty, visitor))
        .collect();
    out.extend(
        namespace
            .functions()
            .iter()
            .map(|&f| model.accept_callable(f, visitor)),
    );
    out
}

/// Visit the methods, then the properties of `ty`.
pub fn walk_type<V: CodeVisitor + ?Sized>(model: &CodeModel, ty: TypeId, visitor: &mut V) -> Vec<V::Output> {
    let mut out: Vec<V::Output> = model
        .type_decl(ty)
        .methods()
        .iter()
        .map(|&m| model.accept_callable(m, visitor))
        .collect();
    for property in model.properties(ty) {
        out.push(model.accept_property(&property, visitor));
    }
    out
}
