use serde::{Deserialize, Serialize};

/// Result of sanitization with metadata about what was redacted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizedText {
    pub text: String,
    pub redactions: Vec<Redaction>,
}

/// A single redaction applied during sanitization. Offsets refer to the input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redaction {
    pub category: String,
    pub marker: String,
    pub start: usize,
    pub end: usize,
}

/// Free-text PII scrubbing.
pub trait ISanitizer: Send + Sync {
    /// Replace every personal-data match with its fixed marker.
    fn sanitize(&self, text: &str) -> SanitizedText;

    /// True when no personal-data pattern remains in `text`.
    fn is_safe(&self, text: &str) -> bool;
}
