//! Engine configuration.
//!
//! Settings come from a TOML file, from the environment, or both: the
//! environment is applied on top of whatever was loaded.

use std::fs;
use std::path::Path;

use pdep_code::NamespaceFilter;
use pdep_parse::ParserConfig;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Set to a truthy value to ignore doc comment annotations.
pub const ENV_WITHOUT_ANNOTATIONS: &str = "PDEP_WITHOUT_ANNOTATIONS";
/// Comma separated namespace exclusion patterns.
pub const ENV_EXCLUDE_NAMESPACES: &str = "PDEP_EXCLUDE_NAMESPACES";
/// Set to a truthy value to skip storing tokens.
pub const ENV_NO_TOKEN_CACHE: &str = "PDEP_NO_TOKEN_CACHE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Ignore `@return`, `@throws` and `@var` annotations.
    #[serde(default)]
    pub without_annotations: bool,

    /// Namespaces hidden from listings; a trailing `*` matches any suffix.
    #[serde(default)]
    pub excluded_namespaces: Vec<String>,

    /// Keep unit and callable tokens in an in-memory cache.
    #[serde(default = "default_cache_tokens")]
    pub cache_tokens: bool,
}

fn default_cache_tokens() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            without_annotations: false,
            excluded_namespaces: Vec::new(),
            cache_tokens: default_cache_tokens(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, EngineError> {
        toml::from_str(content)
            .map_err(|e| EngineError::Config(format!("failed to parse config file: {e}")))
    }

    /// Defaults with the process environment applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Override settings from `lookup`, which maps a variable name to its
    /// value. Unset variables leave the setting alone.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_WITHOUT_ANNOTATIONS) {
            self.without_annotations = is_truthy(&value);
        }
        if let Some(value) = lookup(ENV_EXCLUDE_NAMESPACES) {
            self.excluded_namespaces = value
                .split(',')
                .map(str::trim)
                .filter(|pattern| !pattern.is_empty())
                .map(str::to_owned)
                .collect();
        }
        if let Some(value) = lookup(ENV_NO_TOKEN_CACHE) {
            self.cache_tokens = !is_truthy(&value);
        }
        tracing::debug!(config = ?self, "applied environment overrides");
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            without_annotations: self.without_annotations,
        }
    }

    pub fn namespace_filter(&self) -> NamespaceFilter {
        NamespaceFilter::new(&self.excluded_namespaces)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pdep_code::ArtifactFilter;
    use pretty_assertions::assert_eq;

    use super::*;

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_owned())
        }
    }

    #[test]
    fn defaults_cache_tokens_and_read_annotations() {
        let config = Config::default();
        assert!(config.cache_tokens);
        assert!(!config.without_annotations);
        assert!(config.excluded_namespaces.is_empty());
        assert!(!config.parser_config().without_annotations);
    }

    #[test]
    fn environment_overrides() {
        let mut config = Config::default();
        config.apply_env(env(&[
            (ENV_WITHOUT_ANNOTATIONS, "true"),
            (ENV_EXCLUDE_NAMESPACES, "Vendor\\*, Tests,,"),
            (ENV_NO_TOKEN_CACHE, "1"),
        ]));

        assert_eq!(
            config,
            Config {
                without_annotations: true,
                excluded_namespaces: vec!["Vendor\\*".to_owned(), "Tests".to_owned()],
                cache_tokens: false,
            }
        );
        assert!(config.parser_config().without_annotations);
    }

    #[test]
    fn unset_variables_keep_loaded_values() {
        let mut config = Config::from_toml("without_annotations = true").unwrap();
        config.apply_env(env(&[(ENV_NO_TOKEN_CACHE, "no")]));
        assert!(config.without_annotations);
        assert!(config.cache_tokens);
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config = Config::from_toml("excluded_namespaces = [\"Legacy\\\\*\"]").unwrap();
        assert_eq!(config.excluded_namespaces, vec!["Legacy\\*"]);
        assert!(config.cache_tokens);

        let filter = config.namespace_filter();
        assert!(!filter.accept_namespace("legacy\\db"));
        assert!(filter.accept_namespace("App"));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = Config::from_toml("cache_tokens = \"maybe\"").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(err.to_string().starts_with("configuration error: failed to parse config file"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load(Path::new("/nonexistent/pdep.toml")).unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }
}
