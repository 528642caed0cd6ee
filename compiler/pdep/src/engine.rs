//! From source files to a finished code model.
//!
//! An [`Engine`] parses any number of files into one [`CodeBuilder`]. A
//! file that fails to read or parse is recorded and skipped; the others
//! still contribute their artifacts. [`Engine::finish`] resolves the
//! model and hands back an [`Analysis`].

use std::fs;
use std::path::Path;

use pdep_code::{
    CallableId, CodeBuilder, CodeError, CodeModel, MemoryCacheDriver, NamespaceFilter, NamespaceId,
    TokenCache, TypeId, UnitId,
};
use pdep_ir::Token;
use pdep_parse::{parse_unit, ParserConfig};

use crate::{Config, EngineError};

pub struct Engine {
    config: Config,
    parser: ParserConfig,
    builder: CodeBuilder,
    cache: Option<MemoryCacheDriver>,
    errors: Vec<EngineError>,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        let cache = config.cache_tokens.then(MemoryCacheDriver::new);
        Engine {
            parser: config.parser_config(),
            config,
            builder: CodeBuilder::new(),
            cache,
            errors: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse `source` as the content of `path`.
    ///
    /// Returns the new unit, or `None` when parsing failed and the error
    /// was recorded.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn add_source(&mut self, path: impl AsRef<Path>, source: impl Into<String>) -> Option<UnitId> {
        let cache = self.cache.as_mut().map(|c| c as &mut dyn TokenCache);
        match parse_unit(
            &mut self.builder,
            Some(path.as_ref().to_path_buf()),
            source.into(),
            &self.parser,
            cache,
        ) {
            Ok(unit) => Some(unit),
            Err(err) => {
                tracing::warn!(%err, "skipping unparsable file");
                self.errors.push(err.into());
                None
            }
        }
    }

    /// Read and parse a file. Read failures are recorded like parse errors.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Option<UnitId> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(source) => self.add_source(path, source),
            Err(source) => {
                tracing::warn!(path = %path.display(), %source, "skipping unreadable file");
                self.errors.push(EngineError::Io {
                    path: path.to_path_buf(),
                    source,
                });
                None
            }
        }
    }

    /// Errors recorded so far, in the order files were added.
    pub fn errors(&self) -> &[EngineError] {
        &self.errors
    }

    #[tracing::instrument(level = "debug", skip_all, fields(errors = self.errors.len()))]
    pub fn finish(self) -> Analysis {
        let model = self.builder.finish();
        tracing::debug!(
            units = model.units().count(),
            types = model.types().count(),
            "analysis ready"
        );
        Analysis {
            filter: self.config.namespace_filter(),
            model,
            errors: self.errors,
            cache: self.cache,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(Config::default())
    }
}

/// A finished model together with what went wrong while building it.
pub struct Analysis {
    model: CodeModel,
    errors: Vec<EngineError>,
    cache: Option<MemoryCacheDriver>,
    filter: NamespaceFilter,
}

impl Analysis {
    pub fn model(&self) -> &CodeModel {
        &self.model
    }

    pub fn into_model(self) -> CodeModel {
        self.model
    }

    pub fn errors(&self) -> &[EngineError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// User-defined namespaces not excluded by the configuration.
    pub fn namespaces(&self) -> Vec<NamespaceId> {
        self.model.filtered_namespaces(&self.filter)
    }

    /// Types of `ns` not excluded by the configuration.
    pub fn types(&self, ns: NamespaceId) -> Vec<TypeId> {
        self.model.filtered_types(ns, &self.filter)
    }

    /// Compose the methods of every user-defined class and trait, and
    /// collect the collisions and cycles found.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn check_traits(&self) -> Vec<CodeError> {
        let errors: Vec<CodeError> = self
            .model
            .types()
            .filter(|(_, ty)| ty.is_user_defined() && !ty.is_interface())
            .filter_map(|(id, _)| self.model.trait_methods(id).err())
            .collect();
        tracing::debug!(count = errors.len(), "checked trait composition");
        errors
    }

    pub fn token_cache(&self) -> Option<&dyn TokenCache> {
        self.cache.as_ref().map(|c| c as &dyn TokenCache)
    }

    /// Tokens of a unit; empty when token caching is off.
    pub fn unit_tokens(&self, unit: UnitId) -> Vec<Token> {
        self.token_cache()
            .map(|cache| self.model.unit(unit).tokens(cache))
            .unwrap_or_default()
    }

    /// Tokens of a function or method; empty when token caching is off.
    pub fn callable_tokens(&self, callable: CallableId) -> Vec<Token> {
        self.token_cache()
            .map(|cache| self.model.callable(callable).tokens(cache))
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Result<Vec<u8>, EngineError> {
        Ok(self.model.to_snapshot_bytes()?)
    }
}
