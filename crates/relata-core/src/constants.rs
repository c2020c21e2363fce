/// Earliest calendar year a report may carry.
pub const MIN_REPORT_YEAR: i32 = 2020;

/// Latest calendar year a report may carry.
pub const MAX_REPORT_YEAR: i32 = 2030;

/// Internship ordinals are bounded 1..=5.
pub const MIN_ORDINAL: u8 = 1;
pub const MAX_ORDINAL: u8 = 5;

/// Model tag written by the embedding batch job when none is given.
pub const DEFAULT_EMBEDDING_MODEL: &str = "gemini-embedding-001";

/// Maximum characters of a section excerpt carried in a fact.
pub const MAX_EXCERPT_CHARS: usize = 320;

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "RELATA_LOG";
