/// Retrieval branch errors. Always recoverable at the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("{branch} branch failed: {reason}")]
    BranchFailed { branch: String, reason: String },

    #[error("all retrieval collaborators are unavailable")]
    Unavailable,
}
