//! Provider registry.
//!
//! `"http"` talks to an Ollama-compatible service, `"hashing"` needs nothing external,
//! and `"none"` (the default) disables vector search.

pub mod hashing_provider;
pub mod http_provider;

pub use hashing_provider::HashingProvider;
pub use http_provider::HttpProvider;

use relata_core::config::EmbeddingConfig;
use relata_core::traits::IEmbeddingProvider;
use tracing::{info, warn};

/// Build the configured provider, or `None` when embeddings are disabled.
pub fn create_provider(config: &EmbeddingConfig) -> Option<Box<dyn IEmbeddingProvider>> {
    match config.provider.trim().to_ascii_lowercase().as_str() {
        "http" | "ollama" => {
            let provider = HttpProvider::new(config);
            // The blocking client must not run on an async executor thread.
            let reachable = std::thread::scope(|s| {
                s.spawn(|| provider.health_check()).join().unwrap_or(false)
            });
            info!(
                provider = "http",
                endpoint = %config.endpoint,
                model = %config.model,
                reachable,
                "embedding provider configured"
            );
            Some(Box::new(provider))
        }
        "hashing" => {
            info!(provider = "hashing", dims = config.dimensions, "embedding provider configured");
            Some(Box::new(HashingProvider::new(config.dimensions)))
        }
        "none" | "" => {
            info!("no embedding provider configured; vector search disabled");
            None
        }
        other => {
            warn!(provider = other, "unknown embedding provider; vector search disabled");
            None
        }
    }
}
