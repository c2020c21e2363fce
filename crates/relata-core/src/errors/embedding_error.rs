/// Failures of the optional embedding provider. The dispatcher treats every one of
/// them as "vector branch down" and falls back to structured retrieval.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("embedding has {actual} dimensions, configured for {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("no embedding provider available ({provider})")]
    ProviderUnavailable { provider: String },
}
