use serde::{Deserialize, Serialize};

use super::defaults;

/// Response composer confidence bases and polishing bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    pub structured_confidence: f64,
    pub hybrid_confidence: f64,
    pub vector_confidence: f64,
    pub no_data_confidence: f64,
    pub unavailable_confidence: f64,
    pub polish_timeout_ms: u64,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            structured_confidence: defaults::DEFAULT_STRUCTURED_CONFIDENCE,
            hybrid_confidence: defaults::DEFAULT_HYBRID_CONFIDENCE,
            vector_confidence: defaults::DEFAULT_VECTOR_CONFIDENCE,
            no_data_confidence: defaults::DEFAULT_NO_DATA_CONFIDENCE,
            unavailable_confidence: defaults::DEFAULT_UNAVAILABLE_CONFIDENCE,
            polish_timeout_ms: defaults::DEFAULT_POLISH_TIMEOUT_MS,
        }
    }
}
