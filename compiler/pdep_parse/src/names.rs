//! Name resolution against the current namespace and `use` imports.

use pdep_code::{qualify, GLOBAL_NAMESPACE};
use rustc_hash::FxHashMap;

/// Names that are never classes when they appear as a type.
const SCALAR_TYPES: &[&str] = &[
    "array", "bool", "boolean", "callable", "double", "false", "float", "int", "integer", "iterable",
    "mixed", "never", "null", "object", "resource", "string", "true", "void",
];

pub(crate) fn is_scalar_type(name: &str) -> bool {
    SCALAR_TYPES.contains(&name.to_ascii_lowercase().as_str())
}

/// Imports in effect at a point of the source.
#[derive(Debug)]
pub(crate) struct NameScope {
    namespace: String,
    /// Lower-cased alias to fully qualified name.
    classes: FxHashMap<String, String>,
}

impl Default for NameScope {
    fn default() -> Self {
        NameScope {
            namespace: GLOBAL_NAMESPACE.to_owned(),
            classes: FxHashMap::default(),
        }
    }
}

impl NameScope {
    pub(crate) fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Enter `name`; imports never carry over between namespaces.
    pub(crate) fn enter(&mut self, name: Option<&str>) {
        self.namespace = name.map_or_else(|| GLOBAL_NAMESPACE.to_owned(), |n| n.trim_start_matches('\\').to_owned());
        self.classes.clear();
    }

    /// Record `use Foo\Bar [as Baz]`.
    pub(crate) fn import(&mut self, name: &str, alias: Option<&str>) {
        let name = name.trim_start_matches('\\');
        let alias = alias.unwrap_or_else(|| name.rsplit('\\').next().unwrap_or(name));
        self.classes.insert(alias.to_lowercase(), name.to_owned());
    }

    /// Fully qualified name (without leading backslash) of a class name as
    /// written in the source.
    pub(crate) fn resolve_class(&self, written: &str) -> String {
        if let Some(absolute) = written.strip_prefix('\\') {
            return absolute.to_owned();
        }
        let (first, rest) = match written.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (written, None),
        };
        if first.eq_ignore_ascii_case("namespace") {
            return rest.map_or_else(|| self.namespace.clone(), |rest| qualify(&self.namespace, rest));
        }
        if let Some(imported) = self.classes.get(&first.to_lowercase()) {
            return match rest {
                Some(rest) => format!("{imported}\\{rest}"),
                None => imported.clone(),
            };
        }
        qualify(&self.namespace, written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_imported_and_absolute_names() {
        let mut scope = NameScope::default();
        assert_eq!(scope.resolve_class("Foo"), "Foo");

        scope.enter(Some("App\\Model"));
        scope.import("Vendor\\Lib\\Client", None);
        scope.import("\\Vendor\\Other", Some("Alias"));
        assert_eq!(scope.resolve_class("User"), "App\\Model\\User");
        assert_eq!(scope.resolve_class("client"), "Vendor\\Lib\\Client");
        assert_eq!(scope.resolve_class("Alias\\Sub"), "Vendor\\Other\\Sub");
        assert_eq!(scope.resolve_class("\\Exception"), "Exception");
        assert_eq!(scope.resolve_class("namespace\\Local"), "App\\Model\\Local");

        scope.enter(None);
        assert_eq!(scope.resolve_class("Client"), "Client");
        assert_eq!(scope.namespace(), GLOBAL_NAMESPACE);
    }

    #[test]
    fn scalar_names_are_case_insensitive() {
        assert!(is_scalar_type("Int"));
        assert!(is_scalar_type("void"));
        assert!(!is_scalar_type("Integer\\Thing"));
    }
}
