//! # relata-privacy
//!
//! Last step before report-shaped or free-text data leaves the engine.
//! Applies a per-field-path redaction policy to report payloads and replaces
//! email, phone, CPF, and institutional-id matches in free text with fixed markers.
//! Filtering is idempotent.

pub mod engine;
pub mod patterns;
pub mod policy;

pub use engine::PrivacyFilter;
pub use policy::{FieldPolicy, FieldRule, REPORT_POLICY, SENSITIVE_KEYS};
