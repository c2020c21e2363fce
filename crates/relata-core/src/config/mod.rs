pub mod composer_config;
pub mod defaults;
pub mod embedding_config;
pub mod observability_config;
pub mod privacy_config;
pub mod retrieval_config;
pub mod storage_config;

pub use composer_config::ComposerConfig;
pub use embedding_config::EmbeddingConfig;
pub use observability_config::ObservabilityConfig;
pub use privacy_config::PrivacyConfig;
pub use retrieval_config::RetrievalConfig;
pub use storage_config::StorageConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{RelataError, RelataResult};

/// Top-level configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelataConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub privacy: PrivacyConfig,
    pub composer: ComposerConfig,
    pub observability: ObservabilityConfig,
}

impl RelataConfig {
    /// Parse a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml(source: &str) -> RelataResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| RelataError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make retrieval meaningless.
    pub fn validate(&self) -> RelataResult<()> {
        if self.embedding.dimensions == 0 {
            return Err(RelataError::ConfigError(
                "embedding.dimensions must be positive".to_string(),
            ));
        }
        if self.retrieval.default_limit == 0 || self.retrieval.max_limit == 0 {
            return Err(RelataError::ConfigError(
                "retrieval limits must be positive".to_string(),
            ));
        }
        if self.retrieval.default_limit > self.retrieval.max_limit {
            return Err(RelataError::ConfigError(format!(
                "retrieval.default_limit ({}) exceeds retrieval.max_limit ({})",
                self.retrieval.default_limit, self.retrieval.max_limit
            )));
        }
        let c = &self.composer;
        let ordered = c.unavailable_confidence <= c.no_data_confidence
            && c.no_data_confidence < c.vector_confidence
            && c.vector_confidence <= c.hybrid_confidence
            && c.hybrid_confidence <= c.structured_confidence
            && c.structured_confidence <= 1.0
            && c.unavailable_confidence >= 0.0;
        if !ordered {
            return Err(RelataError::ConfigError(
                "composer confidences must satisfy unavailable <= no_data < vector <= hybrid <= structured <= 1"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
