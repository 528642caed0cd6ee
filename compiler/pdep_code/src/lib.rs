//! pdep code model.
//!
//! Built from parsed PHP sources by a [`CodeBuilder`], the model holds:
//! - compilation units with their syntax trees
//! - namespaces with exclusive ownership of their types and functions
//! - classes, interfaces and traits with inheritance queries
//! - methods and functions with parameters and static variables
//!
//! Cross references are syntax nodes resolved lazily through a
//! [`TypeResolver`] and memoized per node. Trait composition, cycle
//! detection and modifier validation report [`CodeError`]s.

mod builder;
mod callable;
mod dependencies;
mod error;
mod hierarchy;
mod ids;
mod members;
mod model;
mod namespace;
mod reference;
mod snapshot;
mod trait_resolution;
mod types;
mod unit;
mod value;

pub mod cache;
pub mod filter;
pub mod visitor;

#[cfg(test)]
mod tests;

pub use builder::CodeBuilder;
pub use cache::{CacheDriver, MemoryCacheDriver, TokenCache};
pub use callable::{Callable, CallableKind};
pub use error::CodeError;
pub use filter::{AcceptAll, ArtifactFilter, NamespaceFilter};
pub use hierarchy::{MethodMap, ResolvedMethod};
pub use ids::{CallableId, NamespaceId, TypeId, UnitId};
pub use members::{Parameter, Property};
pub use model::CodeModel;
pub use namespace::{Namespace, GLOBAL_NAMESPACE};
pub use reference::TypeResolver;
pub use snapshot::MODEL_SNAPSHOT_VERSION;
pub use types::{qualify, split_qualified, TypeDecl, TypeKind, ANONYMOUS_CLASS};
pub use unit::CompilationUnit;
pub use value::StaticValue;
pub use visitor::CodeVisitor;
