//! Compilation units.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use pdep_ir::{NodeId, Token};
use rustc_hash::FxHasher;

use crate::cache::TokenCache;
use crate::{CallableId, TypeId};

/// One parsed source file.
///
/// Units created in memory (tests, generated code) may have neither a file
/// name nor source text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompilationUnit {
    file: Option<PathBuf>,
    source: Option<String>,
    id: String,
    pub(crate) node: NodeId,
    pub(crate) types: Vec<TypeId>,
    pub(crate) functions: Vec<CallableId>,
    pub(crate) cached: bool,
}

impl CompilationUnit {
    pub(crate) fn new(file: Option<PathBuf>, source: Option<String>, node: NodeId, seq: usize) -> Self {
        let id = unit_id(file.as_deref(), source.as_deref(), seq);
        CompilationUnit {
            file,
            source,
            id,
            node,
            types: Vec::new(),
            functions: Vec::new(),
            cached: false,
        }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Key of this unit's entries in the token cache.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Root `CompilationUnit` node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Classes, interfaces and traits declared in this file.
    pub fn types(&self) -> &[TypeId] {
        &self.types
    }

    pub fn functions(&self) -> &[CallableId] {
        &self.functions
    }

    /// Whether this unit was restored from a snapshot.
    pub fn is_cached(&self) -> bool {
        self.cached
    }

    /// Tokens of the whole file; empty when the cache holds none.
    pub fn tokens(&self, cache: &dyn TokenCache) -> Vec<Token> {
        cache.restore_tokens(&self.id)
    }
}

/// Stable identifier derived from the file name, its content and the
/// position of the unit in its model.
fn unit_id(file: Option<&Path>, source: Option<&str>, seq: usize) -> String {
    let mut hasher = FxHasher::default();
    file.hash(&mut hasher);
    source.hash(&mut hasher);
    seq.hash(&mut hasher);
    format!("{:016x}-{seq}", hasher.finish())
}
