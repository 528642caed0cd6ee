//! Trait composition.
//!
//! The methods of every trait a host uses are collected, the `insteadof`
//! exclusions and `as` aliases of all its `use` statements are applied, and
//! the survivors are merged. Methods the host declares itself are never
//! considered. Two surviving concrete methods under one name are a
//! collision; an abstract method never collides with a concrete one.

use pdep_ir::{NodeId, NodeKind};
use rustc_hash::FxHashSet;

use crate::hierarchy::{MethodMap, ResolvedMethod};
use crate::{CodeError, CodeModel, TypeId};

/// One adaptation rule of a trait `use` block.
enum Rule<'a> {
    /// `T::m as [visibility] [alias]`
    Alias {
        method: String,
        trait_ref: Option<NodeId>,
        alias: Option<&'a str>,
        visibility: pdep_ir::Modifiers,
    },
    /// `T::m insteadof U, V`
    Precedence { method: String, excluded: Vec<NodeId> },
}

impl CodeModel {
    /// Methods `ty` receives from the traits it uses.
    pub fn trait_methods(&self, ty: TypeId) -> Result<MethodMap, CodeError> {
        self.trait_methods_inner(ty, &mut vec![ty])
    }

    pub(crate) fn trait_methods_inner(&self, host: TypeId, path: &mut Vec<TypeId>) -> Result<MethodMap, CodeError> {
        let mut merged = MethodMap::new();
        let Some(node) = self.type_decl(host).node() else {
            return Ok(merged);
        };
        let own: FxHashSet<String> = self.own_methods(host).map(|(key, _)| key).collect();

        let uses: Vec<NodeId> = self
            .ast
            .children(node)
            .iter()
            .copied()
            .filter(|&child| self.ast.kind(child) == NodeKind::TraitUseStatement)
            .collect();

        let rules: Vec<Rule<'_>> = uses.iter().flat_map(|&use_stmt| self.adaptation_rules(use_stmt)).collect();
        let mut excluded: FxHashSet<(TypeId, String)> = FxHashSet::default();
        for rule in &rules {
            if let Rule::Precedence { method, excluded: refs } = rule {
                for &trait_ty in &self.resolve_all(refs) {
                    excluded.insert((trait_ty, method.clone()));
                }
            }
        }

        let used: Vec<NodeId> = uses
            .iter()
            .flat_map(|&use_stmt| self.ast.children(use_stmt).iter().copied())
            .filter(|&child| self.ast.kind(child) == NodeKind::TraitReference)
            .collect();

        let mut traits = self.resolve_all(&used);
        let mut seen = FxHashSet::default();
        traits.retain(|&ty| seen.insert(ty));
        for trait_ty in traits {
            let mut candidates = Vec::new();
            for (key, method) in self.all_methods_inner(trait_ty, path)? {
                let mut original = method.clone();
                for rule in &rules {
                    let Rule::Alias {
                        method: target,
                        trait_ref,
                        alias,
                        visibility,
                    } = rule
                    else {
                        continue;
                    };
                    if *target != key {
                        continue;
                    }
                    if let Some(reference) = trait_ref {
                        if self.resolve_reference(*reference) != Some(trait_ty) {
                            continue;
                        }
                    }
                    match alias {
                        Some(alias) => {
                            let mut renamed = method.clone();
                            renamed.name = (*alias).to_owned();
                            if !visibility.is_empty() {
                                renamed.modifiers = renamed.modifiers.with_visibility(*visibility);
                            }
                            candidates.push((alias.to_lowercase(), renamed));
                        }
                        None if !visibility.is_empty() => {
                            original.modifiers = original.modifiers.with_visibility(*visibility);
                        }
                        None => {}
                    }
                }
                if !excluded.contains(&(trait_ty, key.clone())) {
                    candidates.push((key, original));
                }
            }

            for (key, candidate) in candidates {
                if own.contains(&key) {
                    continue;
                }
                self.merge_trait_method(host, &mut merged, key, candidate)?;
            }
        }
        Ok(merged)
    }

    fn adaptation_rules(&self, use_stmt: NodeId) -> Vec<Rule<'_>> {
        let Some(block) = self
            .ast
            .children(use_stmt)
            .iter()
            .copied()
            .find(|&child| self.ast.kind(child) == NodeKind::TraitAdaptation)
        else {
            return Vec::new();
        };

        self.ast
            .children(block)
            .iter()
            .filter_map(|&rule| {
                let node = self.ast.get(rule);
                let method = node.image.to_lowercase();
                match node.kind {
                    NodeKind::TraitAdaptationAlias => Some(Rule::Alias {
                        method,
                        trait_ref: node.children().first().copied(),
                        alias: node.metadata.alias.as_deref(),
                        visibility: node.metadata.modifiers.get().visibility(),
                    }),
                    NodeKind::TraitAdaptationPrecedence => Some(Rule::Precedence {
                        method,
                        excluded: node.children().iter().skip(1).copied().collect(),
                    }),
                    _ => None,
                }
            })
            .collect()
    }

    fn merge_trait_method(
        &self,
        host: TypeId,
        merged: &mut MethodMap,
        key: String,
        candidate: ResolvedMethod,
    ) -> Result<(), CodeError> {
        let Some(existing) = merged.get(&key) else {
            merged.insert(key, candidate);
            return Ok(());
        };
        if existing.callable == candidate.callable || candidate.is_abstract() {
            return Ok(());
        }
        if existing.is_abstract() {
            merged.insert(key, candidate);
            return Ok(());
        }
        let mut traits = vec![
            self.type_decl(existing.origin).qualified_name(),
            self.type_decl(candidate.origin).qualified_name(),
        ];
        traits.dedup();
        tracing::debug!(method = %candidate.name, ?host, "trait method collision");
        Err(CodeError::TraitMethodCollision {
            method: candidate.name,
            host: self.type_decl(host).qualified_name(),
            traits,
        })
    }
}
