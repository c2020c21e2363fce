//! EmbeddingEngine: the configured provider plus the query cache and dimension checks.

use relata_core::config::EmbeddingConfig;
use relata_core::errors::{EmbeddingError, RelataResult};
use relata_core::traits::IEmbeddingProvider;
use tracing::{debug, info};

use crate::cache::QueryCache;
use crate::providers;

pub struct EmbeddingEngine {
    provider: Option<Box<dyn IEmbeddingProvider>>,
    cache: QueryCache,
    config: EmbeddingConfig,
}

impl EmbeddingEngine {
    /// Build from configuration. A `"none"` provider yields a disabled engine.
    pub fn new(config: EmbeddingConfig) -> Self {
        let provider = providers::create_provider(&config);
        Self::from_parts(provider, config)
    }

    /// Use an explicit provider, e.g. a test double.
    pub fn with_provider(provider: Box<dyn IEmbeddingProvider>, config: EmbeddingConfig) -> Self {
        Self::from_parts(Some(provider), config)
    }

    /// An engine with no provider.
    pub fn disabled(config: EmbeddingConfig) -> Self {
        Self::from_parts(None, config)
    }

    fn from_parts(provider: Option<Box<dyn IEmbeddingProvider>>, config: EmbeddingConfig) -> Self {
        info!(
            provider = provider.as_ref().map(|p| p.name()).unwrap_or("none"),
            dims = config.dimensions,
            "EmbeddingEngine initialized"
        );
        Self {
            provider,
            cache: QueryCache::new(config.cache_size.max(1)),
            config,
        }
    }

    /// Whether any provider is configured.
    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Configured and currently able to serve requests.
    pub fn is_available(&self) -> bool {
        self.provider.as_ref().is_some_and(|p| p.is_available())
    }

    fn ready_provider(&self) -> RelataResult<&dyn IEmbeddingProvider> {
        match self.provider.as_deref() {
            Some(provider) if provider.is_available() => Ok(provider),
            _ => Err(EmbeddingError::ProviderUnavailable {
                provider: self.config.provider.clone(),
            }
            .into()),
        }
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.name())
    }

    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Embed a query, serving repeats from the cache.
    ///
    /// Fails with `ProviderUnavailable` when no provider is configured or the
    /// provider is down, and with `DimensionMismatch` when the provider disagrees
    /// with the configured size.
    pub fn embed_query(&self, text: &str) -> RelataResult<Vec<f32>> {
        if !self.is_enabled() {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.config.provider.clone(),
            }
            .into());
        }

        let key = QueryCache::key(&self.config.model, text.trim());
        if let Some(vec) = self.cache.get(&key) {
            debug!("query embedding cache hit");
            return Ok(vec);
        }

        let provider = self.ready_provider()?;
        let vec = provider.embed(text.trim())?;
        self.validate_dimensions(&vec)?;
        self.cache.insert(key, vec.clone());
        Ok(vec)
    }

    /// Embed documents for indexing. Not cached.
    pub fn embed_documents(&self, texts: &[String]) -> RelataResult<Vec<Vec<f32>>> {
        let provider = self.ready_provider()?;
        let vectors = provider.embed_batch(texts)?;
        for v in &vectors {
            self.validate_dimensions(v)?;
        }
        Ok(vectors)
    }

    fn validate_dimensions(&self, vec: &[f32]) -> RelataResult<()> {
        if vec.len() != self.config.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.dimensions,
                actual: vec.len(),
            }
            .into());
        }
        Ok(())
    }

    pub fn cached_queries(&self) -> u64 {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::HashingProvider;
    use relata_core::errors::RelataError;

    fn config(dims: usize) -> EmbeddingConfig {
        EmbeddingConfig {
            provider: "hashing".to_string(),
            dimensions: dims,
            ..EmbeddingConfig::default()
        }
    }

    #[test]
    fn default_config_is_disabled() {
        let engine = EmbeddingEngine::new(EmbeddingConfig::default());
        assert!(!engine.is_enabled());
        let err = engine.embed_query("python").unwrap_err();
        assert!(matches!(
            err,
            RelataError::EmbeddingError(EmbeddingError::ProviderUnavailable { .. })
        ));
    }

    #[test]
    fn repeated_queries_hit_the_cache() {
        let engine = EmbeddingEngine::new(config(64));
        let a = engine.embed_query("empresas com python").unwrap();
        let b = engine.embed_query("empresas com python").unwrap();
        assert_eq!(a, b);
        assert_eq!(engine.cached_queries(), 1);
    }

    #[test]
    fn provider_with_wrong_size_is_rejected() {
        let engine = EmbeddingEngine::with_provider(Box::new(HashingProvider::new(32)), config(64));
        let err = engine.embed_query("python").unwrap_err();
        assert!(matches!(
            err,
            RelataError::EmbeddingError(EmbeddingError::DimensionMismatch {
                expected: 64,
                actual: 32
            })
        ));
    }
}
