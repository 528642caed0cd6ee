//! Class names from `@return`, `@throws` and `@var` doc annotations.

use crate::names::is_scalar_type;

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Annotations {
    pub returns: Vec<String>,
    pub throws: Vec<String>,
    pub var: Vec<String>,
}

/// Collect the class names (as written) each annotation mentions.
pub(crate) fn annotations(comment: &str) -> Annotations {
    let mut out = Annotations::default();
    for line in comment.lines() {
        let line = line
            .trim()
            .trim_start_matches("/**")
            .trim_end_matches("*/")
            .trim_start_matches('*')
            .trim();
        let mut words = line.split_whitespace();
        let target = match words.next() {
            Some("@return") => &mut out.returns,
            Some("@throws") => &mut out.throws,
            Some("@var") => &mut out.var,
            _ => continue,
        };
        if let Some(types) = words.next() {
            target.extend(class_names(types));
        }
    }
    out
}

/// `Foo|Bar[]|null` to `["Foo", "Bar"]`.
fn class_names(types: &str) -> impl Iterator<Item = String> + '_ {
    types
        .split('|')
        .map(|t| t.trim_start_matches('?').trim_end_matches("[]"))
        .filter(|t| {
            !t.is_empty()
                && !t.starts_with('$')
                && !is_scalar_type(t)
                && !matches!(t.to_ascii_lowercase().as_str(), "self" | "static" | "parent")
                && t.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '\\')
        })
        .map(str::to_owned)
}
