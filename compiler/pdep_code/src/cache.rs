//! Cache collaborator.
//!
//! A [`CacheDriver`] is a plain key/value store partitioned by category.
//! [`TokenCache`] is the typed view the code model uses to keep token
//! streams of units and callables. A miss is never an error: restoring an
//! unknown key yields an empty token list.

use pdep_ir::Token;
use rustc_hash::FxHashMap;

use crate::CodeError;

/// Category under which token streams are stored.
pub const TOKENS: &str = "tokens";

pub trait CacheDriver {
    fn store(&mut self, category: &str, key: &str, bytes: Vec<u8>);

    fn restore(&self, category: &str, key: &str) -> Option<Vec<u8>>;

    fn remove(&mut self, category: &str, key: &str);
}

/// Token streams keyed by unit or callable.
pub trait TokenCache {
    fn store_tokens(&mut self, key: &str, tokens: &[Token]) -> Result<(), CodeError>;

    fn restore_tokens(&self, key: &str) -> Vec<Token>;
}

impl<D: CacheDriver + ?Sized> TokenCache for D {
    fn store_tokens(&mut self, key: &str, tokens: &[Token]) -> Result<(), CodeError> {
        let bytes = bincode::serialize(tokens).map_err(|e| CodeError::Encode {
            what: "token cache entry",
            message: e.to_string(),
        })?;
        self.store(TOKENS, key, bytes);
        Ok(())
    }

    fn restore_tokens(&self, key: &str) -> Vec<Token> {
        let Some(bytes) = self.restore(TOKENS, key) else {
            tracing::trace!(key, "token cache miss");
            return Vec::new();
        };
        match bincode::deserialize(&bytes) {
            Ok(tokens) => tokens,
            Err(err) => {
                tracing::warn!(key, %err, "discarding corrupt token cache entry");
                Vec::new()
            }
        }
    }
}

/// In-process cache driver.
#[derive(Clone, Debug, Default)]
pub struct MemoryCacheDriver {
    entries: FxHashMap<(String, String), Vec<u8>>,
}

impl MemoryCacheDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheDriver for MemoryCacheDriver {
    fn store(&mut self, category: &str, key: &str, bytes: Vec<u8>) {
        self.entries
            .insert((category.to_owned(), key.to_owned()), bytes);
    }

    fn restore(&self, category: &str, key: &str) -> Option<Vec<u8>> {
        self.entries
            .get(&(category.to_owned(), key.to_owned()))
            .cloned()
    }

    fn remove(&mut self, category: &str, key: &str) {
        self.entries.remove(&(category.to_owned(), key.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pdep_ir::{SourceRange, Span, TokenKind};
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_tokens() -> Vec<Token> {
        vec![
            Token::new(
                TokenKind::Function,
                "function",
                Span::new(6, 14),
                SourceRange::new(1, 7, 1, 14),
            ),
            Token::new(
                TokenKind::Identifier,
                "foo",
                Span::new(15, 18),
                SourceRange::new(1, 16, 1, 18),
            ),
        ]
    }

    #[test]
    fn miss_returns_empty_tokens() {
        let cache = MemoryCacheDriver::new();
        assert!(cache.restore_tokens("missing").is_empty());
    }

    #[test]
    fn stored_tokens_are_restored() {
        let mut cache = MemoryCacheDriver::new();
        cache.store_tokens("unit", &sample_tokens()).unwrap();
        assert_eq!(cache.restore_tokens("unit"), sample_tokens());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn corrupt_entry_reads_as_miss() {
        let mut cache = MemoryCacheDriver::new();
        cache.store(TOKENS, "unit", vec![0xFF; 3]);
        assert!(cache.restore_tokens("unit").is_empty());
    }

    #[test]
    fn categories_are_separate() {
        let mut cache = MemoryCacheDriver::new();
        cache.store_tokens("key", &sample_tokens()).unwrap();
        assert_eq!(cache.restore("other", "key"), None);
        cache.remove(TOKENS, "key");
        assert!(cache.is_empty());
    }
}
