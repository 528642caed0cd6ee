//! Artifact filters, passed explicitly to listing queries.

use crate::{CodeModel, TypeId};

pub trait ArtifactFilter {
    fn accept_namespace(&self, name: &str) -> bool;

    fn accept_type(&self, model: &CodeModel, ty: TypeId) -> bool {
        self.accept_namespace(model.type_decl(ty).namespace_name())
    }
}

/// Accepts everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct AcceptAll;

impl ArtifactFilter for AcceptAll {
    fn accept_namespace(&self, _name: &str) -> bool {
        true
    }
}

/// Rejects namespaces matching any pattern.
///
/// Patterns compare case-insensitively; a trailing `*` matches any suffix.
#[derive(Clone, Debug, Default)]
pub struct NamespaceFilter {
    patterns: Vec<String>,
}

impl NamespaceFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        NamespaceFilter {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().trim_start_matches('\\').to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl ArtifactFilter for NamespaceFilter {
    fn accept_namespace(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        !self.patterns.iter().any(|pattern| match pattern.strip_suffix('*') {
            Some(prefix) => name.starts_with(prefix),
            None => name == *pattern,
        })
    }
}
