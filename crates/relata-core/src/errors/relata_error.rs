use super::{EmbeddingError, RetrievalError, StorageError};

/// Top-level error for every Relata operation.
///
/// Subsystem errors convert into it via `?`. The answer path never surfaces one to
/// the end user: branch failures are caught by the dispatcher and turned into
/// fallbacks or a "no data" sentinel.
#[derive(Debug, thiserror::Error)]
pub enum RelataError {
    #[error("report not found: {id}")]
    ReportNotFound { id: i64 },

    #[error("unknown statistics metric: {metric}")]
    UnknownMetric { metric: String },

    #[error("invalid report metadata: {reason}")]
    InvalidMetadata { reason: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("privacy policy violated by field {field}")]
    PrivacyViolation { field: String },

    #[error(transparent)]
    StorageError(#[from] StorageError),

    #[error(transparent)]
    EmbeddingError(#[from] EmbeddingError),

    #[error(transparent)]
    RetrievalError(#[from] RetrievalError),
}
