mod embedding_error;
mod relata_error;
mod retrieval_error;
mod storage_error;

pub use embedding_error::EmbeddingError;
pub use relata_error::RelataError;
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;

/// Workspace-wide result alias.
pub type RelataResult<T> = Result<T, RelataError>;
