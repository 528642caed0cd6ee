//! Persisting a whole model.
//!
//! The snapshot stores the syntax arena and the artifact tables. Parent
//! links, name indexes and the resolution memo are derived data and are
//! rebuilt on load; every restored unit is marked as cached.

use pdep_ir::AstArena;

use crate::{Callable, CodeError, CodeModel, CompilationUnit, Namespace, TypeDecl};

/// Bump when the snapshot layout changes.
pub const MODEL_SNAPSHOT_VERSION: u32 = 2;

#[derive(serde::Serialize, serde::Deserialize)]
struct ModelSnapshot {
    version: u32,
    ast: AstArena,
    units: Vec<CompilationUnit>,
    namespaces: Vec<Namespace>,
    types: Vec<TypeDecl>,
    callables: Vec<Callable>,
}

/// Borrowed form used for encoding without cloning the model.
#[derive(serde::Serialize)]
struct ModelSnapshotRef<'a> {
    version: u32,
    ast: &'a AstArena,
    units: &'a [CompilationUnit],
    namespaces: &'a [Namespace],
    types: &'a [TypeDecl],
    callables: &'a [Callable],
}

impl CodeModel {
    /// Encode the model with bincode.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = self.ast.len()))]
    pub fn to_snapshot_bytes(&self) -> Result<Vec<u8>, CodeError> {
        let snapshot = ModelSnapshotRef {
            version: MODEL_SNAPSHOT_VERSION,
            ast: &self.ast,
            units: &self.units,
            namespaces: &self.namespaces,
            types: &self.types,
            callables: &self.callables,
        };
        bincode::serialize(&snapshot).map_err(|e| CodeError::Encode {
            what: "model snapshot",
            message: e.to_string(),
        })
    }

    /// Decode a model written by [`CodeModel::to_snapshot_bytes`].
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = bytes.len()))]
    pub fn from_snapshot_bytes(bytes: &[u8]) -> Result<CodeModel, CodeError> {
        let snapshot: ModelSnapshot = bincode::deserialize(bytes).map_err(|e| CodeError::Decode {
            what: "model snapshot",
            message: e.to_string(),
        })?;
        if snapshot.version != MODEL_SNAPSHOT_VERSION {
            return Err(CodeError::SnapshotVersion {
                found: snapshot.version,
                expected: MODEL_SNAPSHOT_VERSION,
            });
        }

        let mut model = CodeModel::new();
        model.ast = snapshot.ast;
        model.ast.relink()?;
        model.units = snapshot.units;
        for unit in &mut model.units {
            unit.cached = true;
        }
        model.namespaces = snapshot.namespaces;
        model.types = snapshot.types;
        model.callables = snapshot.callables;
        model.rebuild_indexes();
        tracing::debug!(
            units = model.units.len(),
            types = model.types.len(),
            "restored model snapshot"
        );
        Ok(model)
    }
}
