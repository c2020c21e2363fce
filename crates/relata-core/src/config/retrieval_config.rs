use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Result count used when the utterance names none.
    pub default_limit: usize,
    /// Upper bound on any requested result count.
    pub max_limit: usize,
    /// Nearest sections returned by vector search.
    pub vector_top_k: usize,
    /// Bound on every store and embedding call.
    pub query_timeout_ms: u64,
    /// Reports fetched per company for activity questions.
    pub activities_per_company: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: defaults::DEFAULT_RESULT_LIMIT,
            max_limit: defaults::DEFAULT_MAX_RESULT_LIMIT,
            vector_top_k: defaults::DEFAULT_VECTOR_TOP_K,
            query_timeout_ms: defaults::DEFAULT_QUERY_TIMEOUT_MS,
            activities_per_company: defaults::DEFAULT_ACTIVITIES_PER_COMPANY,
        }
    }
}
