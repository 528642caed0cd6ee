#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::cell::Cell;
use std::rc::Rc;

use pdep_ir::{Modifiers, NodeFlags, NodeId, NodeKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

/// Builds small models by hand, the way the parser would.
struct Fixture {
    b: CodeBuilder,
    unit: UnitId,
    ns: NamespaceId,
}

impl Fixture {
    fn new() -> Self {
        let mut b = CodeBuilder::new();
        let unit = b.begin_unit(Some("test.php".into()), Some("<?php".to_owned())).unwrap();
        let ns = b.namespace(GLOBAL_NAMESPACE);
        Fixture { b, unit, ns }
    }

    fn root(&self) -> NodeId {
        self.b.unit(self.unit).node()
    }

    fn declare(&mut self, kind: TypeKind, name: &str) -> TypeId {
        let node_kind = match kind {
            TypeKind::Class => NodeKind::Class,
            TypeKind::Interface => NodeKind::Interface,
            TypeKind::Trait => NodeKind::Trait,
        };
        let node = self.b.ast_mut().alloc(node_kind, name).unwrap();
        let root = self.root();
        self.b.ast_mut().add_child(root, node).unwrap();
        let unit = Some(self.unit);
        match kind {
            TypeKind::Class => self.b.register_class(unit, self.ns, name, node),
            TypeKind::Interface => self.b.register_interface(unit, self.ns, name, node),
            TypeKind::Trait => self.b.register_trait(unit, self.ns, name, node),
        }
    }

    fn reference(&mut self, ty: TypeId, kind: NodeKind, name: &str) -> NodeId {
        let node = self.b.type_decl(ty).node().unwrap();
        let reference = self.b.ast_mut().alloc(kind, name).unwrap();
        self.b.ast_mut().add_child(node, reference).unwrap();
        reference
    }

    fn class(&mut self, name: &str, parent: Option<&str>, interfaces: &[&str]) -> TypeId {
        let ty = self.declare(TypeKind::Class, name);
        if let Some(parent) = parent {
            let r = self.reference(ty, NodeKind::ClassReference, parent);
            self.b.set_parent_reference(ty, r);
        }
        for interface in interfaces {
            let r = self.reference(ty, NodeKind::ClassOrInterfaceReference, interface);
            self.b.add_interface_reference(ty, r);
        }
        ty
    }

    fn interface(&mut self, name: &str, extends: &[&str]) -> TypeId {
        let ty = self.declare(TypeKind::Interface, name);
        for parent in extends {
            let r = self.reference(ty, NodeKind::ClassOrInterfaceReference, parent);
            self.b.add_interface_reference(ty, r);
        }
        ty
    }

    fn method(&mut self, ty: TypeId, name: &str, modifiers: Modifiers) -> CallableId {
        let node = self.b.ast_mut().alloc(NodeKind::Method, name).unwrap();
        let parent = self.b.type_decl(ty).node().unwrap();
        self.b.ast_mut().add_child(parent, node).unwrap();
        let id = self.b.register_method(ty, name, node);
        self.b.callable_mut(id).set_modifiers(modifiers).unwrap();
        id
    }

    /// `use A, B { ... }` inside `host`; returns the adaptation block.
    fn use_traits(&mut self, host: TypeId, traits: &[&str]) -> NodeId {
        let host_node = self.b.type_decl(host).node().unwrap();
        let ast = self.b.ast_mut();
        let stmt = ast.alloc(NodeKind::TraitUseStatement, "use").unwrap();
        ast.add_child(host_node, stmt).unwrap();
        for name in traits {
            let r = ast.alloc(NodeKind::TraitReference, *name).unwrap();
            ast.add_child(stmt, r).unwrap();
        }
        let block = ast.alloc(NodeKind::TraitAdaptation, "").unwrap();
        ast.add_child(stmt, block).unwrap();
        block
    }

    fn alias(
        &mut self,
        block: NodeId,
        trait_name: Option<&str>,
        method: &str,
        alias: Option<&str>,
        visibility: Modifiers,
    ) {
        let ast = self.b.ast_mut();
        let rule = ast.alloc(NodeKind::TraitAdaptationAlias, method).unwrap();
        ast.add_child(block, rule).unwrap();
        if let Some(name) = trait_name {
            let r = ast.alloc(NodeKind::TraitReference, name).unwrap();
            ast.add_child(rule, r).unwrap();
        }
        let node = ast.get_mut(rule);
        node.metadata.alias = alias.map(str::to_owned);
        node.metadata
            .modifiers
            .assign(pdep_ir::DeclarationKind::Method, visibility)
            .unwrap();
    }

    fn insteadof(&mut self, block: NodeId, winner: &str, method: &str, losers: &[&str]) {
        let ast = self.b.ast_mut();
        let rule = ast.alloc(NodeKind::TraitAdaptationPrecedence, method).unwrap();
        ast.add_child(block, rule).unwrap();
        for name in std::iter::once(&winner).chain(losers) {
            let r = ast.alloc(NodeKind::TraitReference, *name).unwrap();
            ast.add_child(rule, r).unwrap();
        }
    }

    fn finish(self) -> CodeModel {
        self.b.finish()
    }
}

fn method_names(methods: &MethodMap) -> Vec<&str> {
    methods.values().map(|m| m.name.as_str()).collect()
}

// === Hierarchy ===

#[test]
fn is_subtype_of_follows_extends_and_implements() {
    let mut f = Fixture::new();
    let names = ["A", "B", "C", "D", "E", "F"];
    f.interface("A", &[]);
    f.interface("B", &[]);
    f.interface("C", &[]);
    f.interface("D", &[]);
    f.interface("E", &["C"]);
    f.interface("F", &[]);
    f.class("Base", None, &["A"]);
    let child = f.class("Child", Some("Base"), &["E", "F"]);
    let model = f.finish();

    let subtype: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| {
            let other = model.find_type(name).unwrap();
            model.is_subtype_of(child, other).unwrap()
        })
        .collect();
    assert_eq!(subtype, vec!["A", "C", "E", "F"]);
    assert!(model.is_subtype_of(child, child).unwrap());
    assert!(model
        .is_subtype_of(child, model.find_type("Base").unwrap())
        .unwrap());
}

#[test]
fn interfaces_are_collected_transitively_once() {
    let mut f = Fixture::new();
    f.interface("Root", &[]);
    f.interface("Left", &["Root"]);
    f.interface("Right", &["Root"]);
    let ty = f.class("Impl", None, &["Left", "Right"]);
    let model = f.finish();

    let names: Vec<String> = model
        .interfaces(ty)
        .unwrap()
        .into_iter()
        .map(|i| model.type_decl(i).name().to_owned())
        .collect();
    assert_eq!(names, vec!["Left", "Root", "Right"]);
}

#[test]
fn recursive_inheritance_is_an_error() {
    let mut f = Fixture::new();
    let x = f.class("X", Some("Y"), &[]);
    let y = f.class("Y", Some("X"), &[]);
    let z = f.class("Z", None, &[]);
    let model = f.finish();

    assert!(matches!(
        model.parent_classes(x),
        Err(CodeError::RecursiveInheritance { .. })
    ));
    assert!(model.is_subtype_of(y, z).is_err());
    assert!(model.all_methods(x).is_err());
    let err = model.parent_classes(y).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Type Y is referenced recursively in its inheritance hierarchy."
    );
}

#[test]
fn all_methods_child_wins_over_parent() {
    let mut f = Fixture::new();
    let grand = f.class("Grand", None, &[]);
    let parent = f.class("Parent", Some("Grand"), &[]);
    let child = f.class("Child", Some("Parent"), &[]);
    f.method(grand, "a", Modifiers::PUBLIC);
    f.method(grand, "b", Modifiers::PUBLIC);
    f.method(parent, "b", Modifiers::PUBLIC);
    let own = f.method(child, "A", Modifiers::PROTECTED);
    let model = f.finish();

    let methods = model.all_methods(child).unwrap();
    assert_eq!(method_names(&methods), vec!["A", "b"]);
    assert_eq!(methods["a"].callable, own);
    assert_eq!(methods["a"].origin, child);
    assert_eq!(methods["b"].origin, parent);
    assert_eq!(model.parent_classes(child).unwrap(), vec![parent, grand]);
}

#[test]
fn interface_methods_include_extended_interfaces() {
    let mut f = Fixture::new();
    let base = f.interface("Base", &[]);
    let sub = f.interface("Sub", &["Base"]);
    f.method(base, "base", Modifiers::PUBLIC | Modifiers::ABSTRACT);
    f.method(sub, "sub", Modifiers::PUBLIC | Modifiers::ABSTRACT);
    let model = f.finish();

    let methods = model.all_methods(sub).unwrap();
    assert_eq!(method_names(&methods), vec!["base", "sub"]);
    assert!(model.type_decl(sub).is_abstract());
}

// === Traits ===

#[test]
fn alias_and_insteadof_compose_without_collision() {
    let mut f = Fixture::new();
    let t1 = f.declare(TypeKind::Trait, "T1");
    let t2 = f.declare(TypeKind::Trait, "T2");
    let foo1 = f.method(t1, "foo", Modifiers::PUBLIC);
    let foo2 = f.method(t2, "foo", Modifiers::PUBLIC);
    let host = f.class("Host", None, &[]);
    let block = f.use_traits(host, &["T1", "T2"]);
    f.insteadof(block, "T1", "foo", &["T2"]);
    f.alias(block, Some("T2"), "foo", Some("bar"), Modifiers::empty());
    let model = f.finish();

    let methods = model.all_methods(host).unwrap();
    assert_eq!(method_names(&methods), vec!["bar", "foo"]);
    assert_eq!(methods["foo"].callable, foo1);
    assert_eq!(methods["foo"].origin, t1);
    assert_eq!(methods["bar"].callable, foo2);
    assert_eq!(methods["bar"].origin, t2);
}

#[test]
fn unresolved_collision_fails() {
    let mut f = Fixture::new();
    let t1 = f.declare(TypeKind::Trait, "T1");
    let t2 = f.declare(TypeKind::Trait, "T2");
    f.method(t1, "foo", Modifiers::PUBLIC);
    f.method(t2, "foo", Modifiers::PUBLIC);
    let host = f.class("Host", None, &[]);
    f.use_traits(host, &["T1", "T2"]);
    let model = f.finish();

    let err = model.all_methods(host).unwrap_err();
    assert_eq!(
        err,
        CodeError::TraitMethodCollision {
            method: "foo".to_owned(),
            host: "Host".to_owned(),
            traits: vec!["T1".to_owned(), "T2".to_owned()],
        }
    );
}

#[test]
fn insteadof_applies_to_traits_of_other_use_statements() {
    let mut f = Fixture::new();
    let t1 = f.declare(TypeKind::Trait, "T1");
    let t2 = f.declare(TypeKind::Trait, "T2");
    f.method(t1, "foo", Modifiers::PUBLIC);
    let foo2 = f.method(t2, "foo", Modifiers::PUBLIC);
    let host = f.class("Host", None, &[]);
    f.use_traits(host, &["T1"]);
    let block = f.use_traits(host, &["T2"]);
    f.insteadof(block, "T2", "foo", &["T1"]);
    let model = f.finish();

    let methods = model.trait_methods(host).unwrap();
    assert_eq!(method_names(&methods), vec!["foo"]);
    assert_eq!(methods["foo"].callable, foo2);
    assert_eq!(methods["foo"].origin, t2);
}

#[test]
fn alias_applies_to_traits_of_other_use_statements() {
    let mut f = Fixture::new();
    let t1 = f.declare(TypeKind::Trait, "T1");
    let t2 = f.declare(TypeKind::Trait, "T2");
    let foo = f.method(t1, "foo", Modifiers::PUBLIC);
    f.method(t2, "baz", Modifiers::PUBLIC);
    let host = f.class("Host", None, &[]);
    f.use_traits(host, &["T1"]);
    let block = f.use_traits(host, &["T2"]);
    f.alias(block, Some("T1"), "foo", Some("bar"), Modifiers::PROTECTED);
    let model = f.finish();

    let methods = model.trait_methods(host).unwrap();
    assert_eq!(method_names(&methods), vec!["bar", "baz", "foo"]);
    assert_eq!(methods["bar"].callable, foo);
    assert_eq!(methods["bar"].origin, t1);
    assert!(methods["bar"].modifiers.is_protected());
    assert!(methods["foo"].modifiers.is_public());
}

#[test]
fn trait_listed_twice_is_merged_once() {
    let mut f = Fixture::new();
    let t1 = f.declare(TypeKind::Trait, "T1");
    let foo = f.method(t1, "foo", Modifiers::PUBLIC);
    let host = f.class("Host", None, &[]);
    f.use_traits(host, &["T1"]);
    f.use_traits(host, &["T1"]);
    let model = f.finish();

    let methods = model.trait_methods(host).unwrap();
    assert_eq!(method_names(&methods), vec!["foo"]);
    assert_eq!(methods["foo"].callable, foo);
}

#[test]
fn abstract_trait_method_never_collides() {
    let mut f = Fixture::new();
    let t1 = f.declare(TypeKind::Trait, "T1");
    let t2 = f.declare(TypeKind::Trait, "T2");
    f.method(t1, "hook", Modifiers::PUBLIC | Modifiers::ABSTRACT);
    let concrete = f.method(t2, "hook", Modifiers::PUBLIC);
    let host = f.class("Host", None, &[]);
    f.use_traits(host, &["T1", "T2"]);
    let model = f.finish();

    let methods = model.all_methods(host).unwrap();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods["hook"].callable, concrete);
}

#[test]
fn host_method_shadows_trait_methods() {
    let mut f = Fixture::new();
    let t1 = f.declare(TypeKind::Trait, "T1");
    let t2 = f.declare(TypeKind::Trait, "T2");
    f.method(t1, "foo", Modifiers::PUBLIC);
    f.method(t2, "foo", Modifiers::PUBLIC);
    let host = f.class("Host", None, &[]);
    f.use_traits(host, &["T1", "T2"]);
    let own = f.method(host, "foo", Modifiers::PRIVATE);
    let model = f.finish();

    let methods = model.all_methods(host).unwrap();
    assert_eq!(methods["foo"].callable, own);
    assert_eq!(methods["foo"].origin, host);
}

#[test]
fn alias_without_name_changes_visibility() {
    let mut f = Fixture::new();
    let t = f.declare(TypeKind::Trait, "T");
    f.method(t, "foo", Modifiers::PUBLIC | Modifiers::STATIC);
    let host = f.class("Host", None, &[]);
    let block = f.use_traits(host, &["T"]);
    f.alias(block, None, "foo", None, Modifiers::PROTECTED);
    f.alias(block, None, "foo", Some("pub"), Modifiers::PRIVATE);
    let model = f.finish();

    let methods = model.all_methods(host).unwrap();
    assert_eq!(
        methods["foo"].modifiers,
        Modifiers::PROTECTED | Modifiers::STATIC
    );
    assert_eq!(
        methods["pub"].modifiers,
        Modifiers::PRIVATE | Modifiers::STATIC
    );
    assert_eq!(methods["pub"].callable, methods["foo"].callable);
}

#[test]
fn nested_trait_use_is_resolved() {
    let mut f = Fixture::new();
    let inner = f.declare(TypeKind::Trait, "Inner");
    let outer = f.declare(TypeKind::Trait, "Outer");
    let m = f.method(inner, "deep", Modifiers::PUBLIC);
    f.use_traits(outer, &["Inner"]);
    let host = f.class("Host", None, &[]);
    f.use_traits(host, &["Outer"]);
    let model = f.finish();

    let methods = model.all_methods(host).unwrap();
    assert_eq!(methods["deep"].callable, m);
    assert_eq!(methods["deep"].origin, inner);
}

#[test]
fn trait_using_itself_is_recursive() {
    let mut f = Fixture::new();
    let t = f.declare(TypeKind::Trait, "Loop");
    f.use_traits(t, &["Loop"]);
    let model = f.finish();
    assert!(matches!(
        model.all_methods(t),
        Err(CodeError::RecursiveInheritance { .. })
    ));
}

// === Namespaces and builder ===

#[test]
fn namespace_ownership_is_exclusive() {
    let mut f = Fixture::new();
    let ty = f.class("Moved", None, &[]);
    let mut model = f.finish();
    let global = model.find_namespace(GLOBAL_NAMESPACE).unwrap();
    let other = model.namespace_or_insert("Other");

    model.add_type_to_namespace(other, ty);
    model.add_type_to_namespace(other, ty);

    assert!(model.namespace(global).types().is_empty());
    assert_eq!(model.namespace(other).types(), &[ty]);
    assert_eq!(model.type_decl(ty).namespace(), Some(other));
}

#[test]
fn placeholders_for_unknown_references() {
    let mut f = Fixture::new();
    let ty = f.class("Known", Some("Vendor\\Missing"), &[]);
    let model = f.finish();

    let parent = model.parent_class(ty).unwrap();
    let decl = model.type_decl(parent);
    assert_eq!(decl.qualified_name(), "Vendor\\Missing");
    assert!(!decl.is_user_defined());
    let vendor = model.find_namespace("vendor").unwrap();
    assert!(!model.is_user_defined_namespace(vendor));
    assert_eq!(
        model.filtered_namespaces(&AcceptAll),
        vec![model.find_namespace(GLOBAL_NAMESPACE).unwrap()]
    );
}

#[test]
fn anonymous_classes_stay_out_of_listings() {
    let mut f = Fixture::new();
    f.class("Base", None, &[]);
    let node = f.b.ast_mut().alloc(NodeKind::AnonymousClass, ANONYMOUS_CLASS).unwrap();
    let root = f.root();
    f.b.ast_mut().add_child(root, node).unwrap();
    let unit = Some(f.unit);
    let anon = f.b.register_anonymous_class(unit, f.ns, node);
    let parent = f.reference(anon, NodeKind::ClassReference, "Base");
    f.b.set_parent_reference(anon, parent);
    f.method(anon, "run", Modifiers::PUBLIC);
    let unit = f.unit;
    let ns = f.ns;
    let model = f.finish();

    let decl = model.type_decl(anon);
    assert!(decl.is_anonymous());
    assert!(decl.is_user_defined());
    assert!(model.find_type(ANONYMOUS_CLASS).is_none());
    assert!(!model.namespace(ns).types().contains(&anon));
    assert!(!model.unit(unit).types().contains(&anon));
    assert_eq!(model.type_of_node(node), Some(anon));
    assert!(model.is_subtype_of(anon, model.find_type("Base").unwrap()).unwrap());
    assert!(model.find_own_method(anon, "run").is_some());
    assert!(model.ast().kind(node).is_a(NodeKind::Class));
}

#[test]
fn modifiers_are_assigned_once() {
    let mut f = Fixture::new();
    let class = f.class("C", None, &[]);
    let interface = f.interface("I", &[]);
    let mut model = f.finish();

    let decl = model.type_decl_mut(class);
    decl.set_modifiers(Modifiers::FINAL).unwrap();
    assert!(decl.set_modifiers(Modifiers::EXPLICIT_ABSTRACT).is_err());
    assert!(model.type_decl(class).is_final());

    let decl = model.type_decl_mut(interface);
    assert!(decl.is_abstract());
    assert!(decl.set_modifiers(Modifiers::IMPLICIT_ABSTRACT).is_err());
}

// === Reference resolution ===

struct CountingResolver {
    calls: Rc<Cell<usize>>,
    answer: Option<TypeId>,
}

impl TypeResolver for CountingResolver {
    fn class_or_interface(&self, _name: &str) -> Option<TypeId> {
        self.calls.set(self.calls.get() + 1);
        self.answer
    }
}

#[test]
fn reference_resolution_is_memoized() {
    let mut f = Fixture::new();
    let target = f.class("Target", None, &[]);
    let user = f.class("User", Some("Target"), &[]);
    let mut model = f.finish();
    let calls = Rc::new(Cell::new(0));
    model.set_resolver(Box::new(CountingResolver {
        calls: Rc::clone(&calls),
        answer: Some(target),
    }));

    let reference = model.type_decl(user).parent_reference().unwrap();
    assert_eq!(model.resolve_reference(reference), Some(target));
    assert_eq!(model.resolve_reference(reference), Some(target));
    assert_eq!(model.parent_class(user), Some(target));
    assert_eq!(calls.get(), 1);
}

#[test]
fn self_and_parent_references_use_enclosing_type() {
    let mut f = Fixture::new();
    let base = f.class("Base", None, &[]);
    let child = f.class("Child", Some("Base"), &[]);
    let method = f.method(child, "make", Modifiers::PUBLIC);
    let node = f.b.callable(method).node();
    let ast = f.b.ast_mut();
    let self_ref = ast.alloc(NodeKind::SelfReference, "self").unwrap();
    let parent_ref = ast.alloc(NodeKind::ParentReference, "parent").unwrap();
    ast.add_child(node, self_ref).unwrap();
    ast.add_child(node, parent_ref).unwrap();
    let model = f.finish();

    assert_eq!(model.resolve_reference(self_ref), Some(child));
    assert_eq!(model.resolve_reference(parent_ref), Some(base));
    assert_eq!(model.callable_dependencies(method), vec![base]);
}

// === Callables ===

fn add_parameter(f: &mut Fixture, list: NodeId, name: &str, default: Option<&str>) {
    let ast = f.b.ast_mut();
    let param = ast.alloc(NodeKind::FormalParameter, "").unwrap();
    let declarator = ast.alloc(NodeKind::VariableDeclarator, name).unwrap();
    ast.add_child(list, param).unwrap();
    ast.add_child(param, declarator).unwrap();
    if let Some(value) = default {
        let literal = ast.alloc(NodeKind::Literal, value).unwrap();
        ast.add_child(declarator, literal).unwrap();
    }
}

#[test]
fn parameter_optionality_is_per_parameter() {
    let mut f = Fixture::new();
    let ty = f.class("C", None, &[]);
    let method = f.method(ty, "m", Modifiers::PUBLIC);
    let node = f.b.callable(method).node();
    let list = f.b.ast_mut().alloc(NodeKind::FormalParameters, "").unwrap();
    f.b.ast_mut().add_child(node, list).unwrap();
    add_parameter(&mut f, list, "$required", None);
    add_parameter(&mut f, list, "$withDefault", Some("1"));
    add_parameter(&mut f, list, "$alsoDefault", Some("2"));
    let first = f.b.ast().child(list, 0).unwrap();
    f.b.ast_mut().get_mut(first).metadata.flags |= NodeFlags::BY_REFERENCE;
    let model = f.finish();

    let params = model.parameters(method);
    let optional: Vec<bool> = params.iter().map(Parameter::is_optional).collect();
    assert_eq!(optional, vec![false, true, true]);
    assert_eq!(params[1].name, "$withDefault");
    assert_eq!(params[2].position, 2);
    assert!(params[0].by_reference);
}

#[test]
fn static_variables_merge_later_wins() {
    let mut f = Fixture::new();
    let ty = f.class("C", None, &[]);
    let method = f.method(ty, "m", Modifiers::PUBLIC);
    let node = f.b.callable(method).node();
    let ast = f.b.ast_mut();
    for decls in [[("$a", "1"), ("$b", "2")], [("$a", "3"), ("$c", "'x'")]] {
        let stmt = ast.alloc(NodeKind::StaticVariableDeclaration, "static").unwrap();
        ast.add_child(node, stmt).unwrap();
        for (name, value) in decls {
            let declarator = ast.alloc(NodeKind::VariableDeclarator, name).unwrap();
            let literal = ast.alloc(NodeKind::Literal, value).unwrap();
            ast.add_child(stmt, declarator).unwrap();
            ast.add_child(declarator, literal).unwrap();
        }
    }
    let model = f.finish();

    let vars: Vec<(String, StaticValue)> = model.static_variables(method).into_iter().collect();
    assert_eq!(
        vars,
        vec![
            ("a".to_owned(), StaticValue::Int(3)),
            ("b".to_owned(), StaticValue::Int(2)),
            ("c".to_owned(), StaticValue::String("x".to_owned())),
        ]
    );
}

// === Snapshots ===

#[test]
fn snapshot_round_trip_preserves_identity_and_links() {
    let mut f = Fixture::new();
    f.interface("Shared", &[]);
    let base = f.class("Base", None, &[]);
    let a = f.class("A", Some("Base"), &["Shared"]);
    let b = f.class("B", Some("Base"), &["Shared"]);
    let m = f.method(a, "run", Modifiers::PUBLIC);
    let model = f.finish();

    let bytes = model.to_snapshot_bytes().unwrap();
    let restored = CodeModel::from_snapshot_bytes(&bytes).unwrap();

    let (_, unit) = restored.units().next().unwrap();
    assert!(unit.is_cached());
    assert_eq!(restored.parent_class(a), Some(base));
    assert_eq!(restored.parent_class(b), restored.parent_class(a));
    assert_eq!(restored.interfaces(a).unwrap(), restored.interfaces(b).unwrap());
    let method_node = restored.callable(m).node();
    assert_eq!(
        restored.ast().parent(method_node),
        restored.type_decl(a).node()
    );
    assert_eq!(restored.type_decl(a).namespace(), restored.type_decl(b).namespace());
    assert_eq!(restored.find_type("a"), Some(a));
}

#[test]
fn snapshot_rejects_garbage() {
    assert!(matches!(
        CodeModel::from_snapshot_bytes(&[1, 2, 3]),
        Err(CodeError::Decode { .. })
    ));
}

// === Visitors and filters ===

struct KindNames;

impl CodeVisitor for KindNames {
    type Output = String;

    fn visit_class(&mut self, model: &CodeModel, ty: TypeId) -> String {
        format!("class {}", model.type_decl(ty).name())
    }

    fn visit_interface(&mut self, model: &CodeModel, ty: TypeId) -> String {
        format!("interface {}", model.type_decl(ty).name())
    }

    fn visit_method(&mut self, model: &CodeModel, method: CallableId) -> String {
        format!("method {}", model.callable(method).name())
    }
}

#[test]
fn code_visitor_passes_results_through() {
    let mut f = Fixture::new();
    let c = f.class("C", None, &[]);
    f.interface("I", &[]);
    f.declare(TypeKind::Trait, "T");
    f.method(c, "go", Modifiers::PUBLIC);
    let model = f.finish();
    let global = model.find_namespace(GLOBAL_NAMESPACE).unwrap();

    let mut names = KindNames;
    assert_eq!(
        visitor::walk_namespace(&model, global, &mut names),
        vec!["class C", "interface I", ""]
    );
    assert_eq!(visitor::walk_type(&model, c, &mut names), vec!["method go"]);
}

#[test]
fn filtered_types_respect_namespace_filter() {
    let mut f = Fixture::new();
    f.class("Kept", None, &[]);
    let mut model = f.finish();
    let hidden = model.namespace_or_insert("Hidden\\Sub");
    let ty = model.find_type("Kept").unwrap();
    model.add_type_to_namespace(hidden, ty);

    let filter = NamespaceFilter::new(["hidden\\*"]);
    assert!(model.filtered_namespaces(&filter).is_empty());
    assert!(model.filtered_types(hidden, &filter).is_empty());
    assert_eq!(model.filtered_types(hidden, &AcceptAll), vec![ty]);
}

proptest! {
    #[test]
    fn linear_chain_subtyping(len in 1usize..12, i in 0usize..12, j in 0usize..12) {
        let (i, j) = (i % len, j % len);
        let mut f = Fixture::new();
        let mut ids = Vec::new();
        for k in 0..len {
            let parent = (k > 0).then(|| format!("C{}", k - 1));
            ids.push(f.class(&format!("C{k}"), parent.as_deref(), &[]));
        }
        let model = f.finish();
        prop_assert_eq!(model.is_subtype_of(ids[i], ids[j]).unwrap(), i >= j);
        prop_assert_eq!(model.parent_classes(ids[i]).unwrap().len(), i);
    }
}
