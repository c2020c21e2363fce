//! Provider selection and engine behavior through the public API.

use relata_core::config::EmbeddingConfig;
use relata_core::errors::{EmbeddingError, RelataError, RelataResult};
use relata_core::traits::IEmbeddingProvider;
use relata_embeddings::{create_provider, EmbeddingEngine};

struct FixedProvider(Vec<f32>, bool);

impl IEmbeddingProvider for FixedProvider {
    fn embed(&self, _text: &str) -> RelataResult<Vec<f32>> {
        Ok(self.0.clone())
    }

    fn dimensions(&self) -> usize {
        self.0.len()
    }

    fn name(&self) -> &str {
        "fixed"
    }

    fn is_available(&self) -> bool {
        self.1
    }
}

#[test]
fn provider_names_select_implementations() {
    let mut config = EmbeddingConfig {
        dimensions: 16,
        ..EmbeddingConfig::default()
    };
    assert!(create_provider(&config).is_none());

    config.provider = "hashing".to_string();
    let provider = create_provider(&config).expect("hashing provider");
    assert_eq!(provider.name(), "hashing");
    assert_eq!(provider.dimensions(), 16);

    config.provider = "http".to_string();
    let provider = create_provider(&config).expect("http provider");
    assert_eq!(provider.name(), config.model);

    config.provider = "word2vec".to_string();
    assert!(create_provider(&config).is_none());
}

#[test]
fn explicit_provider_is_used() {
    let config = EmbeddingConfig {
        dimensions: 3,
        ..EmbeddingConfig::default()
    };
    let engine = EmbeddingEngine::with_provider(Box::new(FixedProvider(vec![0.1, 0.2, 0.3], true)), config);
    assert!(engine.is_enabled());
    assert_eq!(engine.provider_name(), Some("fixed"));
    assert_eq!(engine.embed_query("x").unwrap(), vec![0.1, 0.2, 0.3]);
    assert_eq!(
        engine
            .embed_documents(&["a".to_string(), "b".to_string()])
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn disabled_engine_reports_not_enabled() {
    let engine = EmbeddingEngine::disabled(EmbeddingConfig::default());
    assert!(!engine.is_enabled());
    assert!(engine.embed_documents(&["a".to_string()]).is_err());
}

#[test]
fn unavailable_provider_is_not_called() {
    let config = EmbeddingConfig {
        dimensions: 3,
        ..EmbeddingConfig::default()
    };
    let engine = EmbeddingEngine::with_provider(Box::new(FixedProvider(vec![0.1, 0.2, 0.3], false)), config);
    assert!(engine.is_enabled());
    assert!(!engine.is_available());
    assert!(matches!(
        engine.embed_query("x").unwrap_err(),
        RelataError::EmbeddingError(EmbeddingError::ProviderUnavailable { .. })
    ));
    assert!(engine.embed_documents(&["a".to_string()]).is_err());
    assert_eq!(engine.cached_queries(), 0);
}
