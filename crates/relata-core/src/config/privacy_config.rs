use serde::{Deserialize, Serialize};

use super::defaults;

/// Privacy filter configuration.
///
/// The intern and supervisor rules, plus email/phone/CPF scrubbing, are fixed and
/// cannot be switched off here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyConfig {
    /// Scrub bare 7-8 digit institutional ids from free text.
    pub redact_institutional_id: bool,
    /// Extra object keys removed wherever they appear in a payload.
    pub extra_sensitive_keys: Vec<String>,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            redact_institutional_id: defaults::DEFAULT_REDACT_INSTITUTIONAL_ID,
            extra_sensitive_keys: Vec::new(),
        }
    }
}
