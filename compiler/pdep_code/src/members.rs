//! Parameters, properties, constants and static variables.
//!
//! These are read from the syntax tree on demand rather than stored in the
//! model.

use std::collections::BTreeMap;

use pdep_ir::{Modifiers, NodeFlags, NodeId, NodeKind};

use crate::{CallableId, CodeError, CodeModel, StaticValue, TypeId};

/// A formal parameter of a callable or closure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub node: NodeId,
    pub position: usize,
    /// Name including the leading `$`.
    pub name: String,
    pub type_hint: Option<NodeId>,
    pub default: Option<NodeId>,
    pub by_reference: bool,
    pub variadic: bool,
}

impl Parameter {
    /// A parameter is optional exactly when it has a default value;
    /// neighbouring parameters play no role.
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

/// A property declared in a class or trait body.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    /// Name including the leading `$`.
    pub name: String,
    pub declaring: TypeId,
    /// The `VariableDeclarator` node.
    pub node: NodeId,
    pub modifiers: Modifiers,
    /// Declared hint or `@var` annotation.
    pub type_hint: Option<NodeId>,
    pub default: Option<StaticValue>,
}

impl Property {
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }
}

impl CodeModel {
    /// Parameters of a method or function in declaration order.
    pub fn parameters(&self, callable: CallableId) -> Vec<Parameter> {
        self.parameters_of(self.callable(callable).node())
    }

    /// Parameters of any function-like node (methods, functions, closures).
    pub fn parameters_of(&self, node: NodeId) -> Vec<Parameter> {
        let Some(list) = self
            .ast
            .children(node)
            .iter()
            .copied()
            .find(|&child| self.ast.kind(child) == NodeKind::FormalParameters)
        else {
            return Vec::new();
        };

        self.ast
            .children(list)
            .iter()
            .enumerate()
            .filter_map(|(position, &param)| {
                let node = self.ast.get(param);
                let type_hint = node
                    .children()
                    .iter()
                    .copied()
                    .find(|&c| self.ast.kind(c).is_a(NodeKind::Type));
                let declarator = node
                    .children()
                    .iter()
                    .copied()
                    .find(|&c| self.ast.kind(c) == NodeKind::VariableDeclarator)?;
                Some(Parameter {
                    node: param,
                    position,
                    name: self.ast.image(declarator).to_owned(),
                    type_hint,
                    default: self.ast.children(declarator).first().copied(),
                    by_reference: node.has_flag(NodeFlags::BY_REFERENCE),
                    variadic: node.has_flag(NodeFlags::VARIADIC),
                })
            })
            .collect()
    }

    /// Variables declared with `static` anywhere in the body, keyed by name
    /// without `$`. A later declaration of the same name replaces the value.
    pub fn static_variables(&self, callable: CallableId) -> BTreeMap<String, StaticValue> {
        let node = self.callable(callable).node();
        let mut out = BTreeMap::new();
        for decl in self.ast.find_children_of_kind(node, NodeKind::StaticVariableDeclaration) {
            for &declarator in self.ast.children(decl) {
                if self.ast.kind(declarator) != NodeKind::VariableDeclarator {
                    continue;
                }
                let name = self.ast.image(declarator).trim_start_matches('$').to_owned();
                let value = self
                    .ast
                    .children(declarator)
                    .first()
                    .map_or(StaticValue::Null, |&v| StaticValue::evaluate(&self.ast, v));
                out.insert(name, value);
            }
        }
        out
    }

    /// Properties declared directly in `ty`.
    pub fn properties(&self, ty: TypeId) -> Vec<Property> {
        let Some(node) = self.type_decl(ty).node() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for &field in self.ast.children(node) {
            let field_node = self.ast.get(field);
            if field_node.kind != NodeKind::FieldDeclaration {
                continue;
            }
            let modifiers = field_node.metadata.modifiers.get();
            let type_hint = field_node
                .children()
                .iter()
                .copied()
                .find(|&c| self.ast.kind(c).is_a(NodeKind::Type));
            for &declarator in field_node.children() {
                if self.ast.kind(declarator) != NodeKind::VariableDeclarator {
                    continue;
                }
                out.push(Property {
                    name: self.ast.image(declarator).to_owned(),
                    declaring: ty,
                    node: declarator,
                    modifiers,
                    type_hint,
                    default: self
                        .ast
                        .children(declarator)
                        .first()
                        .map(|&v| StaticValue::evaluate(&self.ast, v)),
                });
            }
        }
        out
    }

    /// Resolved class type of a property, if its hint names one.
    pub fn property_type(&self, property: &Property) -> Option<TypeId> {
        let hint = property.type_hint?;
        let hint = if self.ast.kind(hint) == NodeKind::NullableType {
            self.ast.children(hint).first().copied()?
        } else {
            hint
        };
        self.resolve_reference(hint)
    }

    /// Constants declared directly in `ty`.
    pub fn own_constants(&self, ty: TypeId) -> BTreeMap<String, StaticValue> {
        let mut out = BTreeMap::new();
        let Some(node) = self.type_decl(ty).node() else {
            return out;
        };
        for &definition in self.ast.children(node) {
            if self.ast.kind(definition) != NodeKind::ConstantDefinition {
                continue;
            }
            for &declarator in self.ast.children(definition) {
                let value = self
                    .ast
                    .children(declarator)
                    .first()
                    .map_or(StaticValue::Unknown, |&v| StaticValue::evaluate(&self.ast, v));
                out.insert(self.ast.image(declarator).to_owned(), value);
            }
        }
        out
    }

    /// Constants of `ty` including those inherited from parents and
    /// interfaces; the nearest declaration wins.
    pub fn constants(&self, ty: TypeId) -> Result<BTreeMap<String, StaticValue>, CodeError> {
        let mut out = BTreeMap::new();
        for sup in self.supertypes(ty)? {
            for (name, value) in self.own_constants(sup) {
                out.entry(name).or_insert(value);
            }
        }
        Ok(out)
    }
}
