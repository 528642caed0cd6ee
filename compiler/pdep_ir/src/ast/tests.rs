#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::{AstError, Modifiers, SourceRange, Span};

/// ```text
/// Scope
/// ├── IfStatement
/// │   ├── Expression
/// │   │   └── ArrayIndexExpression "a"
/// │   └── ScopeStatement
/// │       └── ArrayIndexExpression "b"
/// └── StringIndexExpression "c"
/// ```
fn sample() -> (AstArena, Vec<NodeId>) {
    let mut arena = AstArena::new();
    let root = arena.alloc(NodeKind::Scope, "").unwrap();
    let if_stmt = arena.alloc(NodeKind::IfStatement, "if").unwrap();
    let cond = arena.alloc(NodeKind::Expression, "").unwrap();
    let a = arena.alloc(NodeKind::ArrayIndexExpression, "a").unwrap();
    let body = arena.alloc(NodeKind::ScopeStatement, "").unwrap();
    let b = arena.alloc(NodeKind::ArrayIndexExpression, "b").unwrap();
    let c = arena.alloc(NodeKind::StringIndexExpression, "c").unwrap();
    arena.add_child(root, if_stmt).unwrap();
    arena.add_child(if_stmt, cond).unwrap();
    arena.add_child(cond, a).unwrap();
    arena.add_child(if_stmt, body).unwrap();
    arena.add_child(body, b).unwrap();
    arena.add_child(root, c).unwrap();
    (arena, vec![root, if_stmt, cond, a, body, b, c])
}

#[test]
fn child_out_of_bounds_fails() {
    let (arena, ids) = sample();
    let root = ids[0];
    assert_eq!(arena.children(root).len(), 2);
    assert!(arena.child(root, 1).is_ok());
    let err = arena.child(root, 2).unwrap_err();
    assert_eq!(
        err,
        AstError::ChildOutOfBounds {
            index: 2,
            len: 2,
            kind: NodeKind::Scope
        }
    );
    assert_eq!(
        err.to_string(),
        "No node found at index 2 in node of type: Scope"
    );
    assert!(arena.child(ids[3], 0).is_err());
}

#[test]
fn first_child_of_kind_is_pre_order() {
    let (arena, ids) = sample();
    assert_eq!(
        arena.first_child_of_kind(ids[0], NodeKind::IndexExpression),
        Some(ids[3])
    );
    assert_eq!(
        arena.first_child_of_kind(ids[0], NodeKind::StringIndexExpression),
        Some(ids[6])
    );
    assert_eq!(arena.first_child_of_kind(ids[0], NodeKind::Variable), None);
}

#[test]
fn first_child_of_kind_does_not_match_self() {
    let (arena, ids) = sample();
    assert_eq!(arena.first_child_of_kind(ids[1], NodeKind::IfStatement), None);
}

#[test]
fn find_children_of_kind_includes_indirect_descendants() {
    let (arena, ids) = sample();
    assert_eq!(
        arena.find_children_of_kind(ids[0], NodeKind::IndexExpression),
        vec![ids[3], ids[5], ids[6]]
    );
    assert_eq!(
        arena.find_children_of_kind(ids[0], NodeKind::Statement),
        vec![ids[1]]
    );
    assert_eq!(
        arena.find_children_of_kind(ids[0], NodeKind::Scope),
        vec![ids[4]]
    );
}

#[test]
fn parents_of_kind_is_outermost_first() {
    let mut arena = AstArena::new();
    let outer = arena.alloc(NodeKind::Scope, "outer").unwrap();
    let middle = arena.alloc(NodeKind::ScopeStatement, "middle").unwrap();
    let other = arena.alloc(NodeKind::Expression, "").unwrap();
    let inner = arena.alloc(NodeKind::ScopeStatement, "inner").unwrap();
    let leaf = arena.alloc(NodeKind::Variable, "$x").unwrap();
    arena.add_child(outer, middle).unwrap();
    arena.add_child(middle, other).unwrap();
    arena.add_child(other, inner).unwrap();
    arena.add_child(inner, leaf).unwrap();

    assert_eq!(
        arena.parents_of_kind(leaf, NodeKind::Scope),
        vec![outer, middle, inner]
    );
    assert_eq!(arena.parent_of_kind(leaf, NodeKind::Scope), Some(inner));
    assert_eq!(arena.root_of(leaf), outer);
}

#[test]
fn reparenting_removes_from_old_parent() {
    let (mut arena, ids) = sample();
    let (root, cond, a) = (ids[0], ids[2], ids[3]);
    arena.add_child(root, a).unwrap();

    assert!(arena.children(cond).is_empty());
    assert_eq!(arena.children(root), &[ids[1], ids[6], a]);
    assert_eq!(arena.parent(a), Some(root));
}

#[test]
fn prepend_child_puts_node_first() {
    let (mut arena, ids) = sample();
    let root = ids[0];
    let first = arena.alloc(NodeKind::Literal, "1").unwrap();
    arena.prepend_child(root, first).unwrap();
    assert_eq!(arena.child(root, 0).unwrap(), first);
    assert_eq!(arena.child(root, 1).unwrap(), ids[1]);
    assert_eq!(arena.parent(first), Some(root));
}

#[test]
fn adding_ancestor_as_child_fails() {
    let (mut arena, ids) = sample();
    let err = arena.add_child(ids[5], ids[1]).unwrap_err();
    assert_eq!(
        err,
        AstError::Cycle {
            parent: ids[5],
            child: ids[1]
        }
    );
    assert_eq!(arena.parent(ids[1]), Some(ids[0]));
}

#[test]
fn specialisation_chain() {
    assert!(NodeKind::TraitReference.is_a(NodeKind::ClassOrInterfaceReference));
    assert!(NodeKind::TraitReference.is_a(NodeKind::Type));
    assert!(NodeKind::NullableType.is_a(NodeKind::Type));
    assert!(NodeKind::TraitAdaptationAlias.is_a(NodeKind::Statement));
    assert!(!NodeKind::Type.is_a(NodeKind::ClassReference));
    assert!(!NodeKind::IndexExpression.is_a(NodeKind::ArrayIndexExpression));
}

#[test]
fn snapshot_restore_relinks_parents() {
    let (mut arena, ids) = sample();
    arena.get_mut(ids[1]).comment = Some("/** doc */".to_owned());
    arena
        .get_mut(ids[4])
        .metadata
        .modifiers
        .assign(crate::DeclarationKind::Method, Modifiers::PUBLIC)
        .unwrap();
    arena.set_position(ids[3], Span::new(10, 11), SourceRange::new(2, 3, 2, 3));

    let snapshot = arena.snapshot(ids[0]);
    let mut fresh = AstArena::new();
    let root = fresh.restore(&snapshot).unwrap();

    assert_eq!(fresh.snapshot(root), snapshot);
    for id in fresh.descendants(root) {
        let parent = fresh.parent(id).unwrap();
        assert_eq!(
            fresh.children(parent).iter().filter(|&&c| c == id).count(),
            1
        );
    }
    let if_stmt = fresh.child(root, 0).unwrap();
    assert_eq!(fresh[if_stmt].comment.as_deref(), Some("/** doc */"));
    let a = fresh.first_child_of_kind(root, NodeKind::ArrayIndexExpression).unwrap();
    assert_eq!(fresh[a].range, SourceRange::new(2, 3, 2, 3));
}

#[test]
fn restore_rejects_other_versions() {
    let (arena, ids) = sample();
    let mut snapshot = arena.snapshot(ids[0]);
    snapshot.version = SNAPSHOT_VERSION + 1;
    assert!(matches!(
        AstArena::new().restore(&snapshot),
        Err(AstError::SnapshotVersion { .. })
    ));
}

#[cfg(feature = "cache")]
#[test]
fn serialized_arena_relinks_after_decode() {
    let (arena, ids) = sample();
    let bytes = bincode::serialize(&arena).unwrap();
    let mut decoded: AstArena = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded.parent(ids[5]), None);
    decoded.relink().unwrap();
    assert_eq!(decoded, arena);
    assert_eq!(decoded.parent(ids[5]), Some(ids[4]));
}

#[derive(Clone, Debug)]
enum Op {
    Add(usize, usize),
    Prepend(usize, usize),
    Detach(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..12usize, 0..12usize).prop_map(|(p, c)| Op::Add(p, c)),
        (0..12usize, 0..12usize).prop_map(|(p, c)| Op::Prepend(p, c)),
        (0..12usize).prop_map(Op::Detach),
    ]
}

proptest! {
    #[test]
    fn parent_links_stay_consistent(ops in proptest::collection::vec(op(), 0..64)) {
        let mut arena = AstArena::new();
        let ids: Vec<NodeId> = (0..12).map(|i| arena.alloc(NodeKind::Expression, i.to_string()).unwrap()).collect();
        for op in ops {
            // Cycles are rejected and leave the tree untouched.
            let _ = match op {
                Op::Add(p, c) => arena.add_child(ids[p], ids[c]),
                Op::Prepend(p, c) => arena.prepend_child(ids[p], ids[c]),
                Op::Detach(c) => {
                    arena.detach(ids[c]);
                    Ok(())
                }
            };
        }
        for &id in &ids {
            if let Some(parent) = arena.parent(id) {
                let count = arena.children(parent).iter().filter(|&&c| c == id).count();
                prop_assert_eq!(count, 1);
            }
            for &child in arena.children(id) {
                prop_assert_eq!(arena.parent(child), Some(id));
            }
            prop_assert!(arena.ancestors(id).count() < ids.len());
        }
    }
}

#[test]
fn iter_yields_the_allocated_ids() {
    let (arena, ids) = sample();
    let listed: Vec<NodeId> = arena.iter().map(|(id, _)| id).collect();

    assert_eq!(listed, ids);
    assert_eq!(
        AstError::TooManyNodes { count: 1 << 32 }.to_string(),
        "syntax tree of 4294967296 nodes exceeds the node id range"
    );
}
