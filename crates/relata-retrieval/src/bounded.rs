//! Blocking collaborator calls moved off the async runtime and bounded by a timeout.

use std::time::Duration;

use tokio::task::spawn_blocking;
use tracing::warn;

use relata_core::errors::{RelataResult, RetrievalError};

/// Run `call` on the blocking pool. A timeout or a panicked task becomes a
/// `RetrievalError`; the caller decides whether to fall back.
pub(crate) async fn run_bounded<T, F>(operation: &str, timeout_ms: u64, call: F) -> RelataResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> RelataResult<T> + Send + 'static,
{
    let task = spawn_blocking(call);
    match tokio::time::timeout(Duration::from_millis(timeout_ms), task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join)) => {
            warn!(operation, error = %join, "blocking task failed");
            Err(RetrievalError::BranchFailed {
                branch: operation.to_string(),
                reason: format!("join error: {join}"),
            }
            .into())
        }
        Err(_) => {
            warn!(operation, timeout_ms, "collaborator call timed out");
            Err(RetrievalError::Timeout {
                operation: operation.to_string(),
                timeout_ms,
            }
            .into())
        }
    }
}
