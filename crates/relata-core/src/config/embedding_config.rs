use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::DEFAULT_EMBEDDING_MODEL;

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider: "none", "http", or "hashing".
    pub provider: String,
    /// Base URL of the HTTP embedding service.
    pub endpoint: String,
    /// Model tag sent to the provider and matched against stored embeddings.
    pub model: String,
    /// Declared dimensionality. Stored vectors of any other length are skipped.
    pub dimensions: usize,
    pub timeout_ms: u64,
    /// Query-embedding cache capacity (entries).
    pub cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            endpoint: defaults::DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            timeout_ms: defaults::DEFAULT_EMBEDDING_TIMEOUT_MS,
            cache_size: defaults::DEFAULT_EMBEDDING_CACHE_SIZE,
        }
    }
}
