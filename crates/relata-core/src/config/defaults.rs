// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "relata.db";
pub const DEFAULT_WAL_MODE: bool = true;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "none";
pub const DEFAULT_EMBEDDING_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;
pub const DEFAULT_EMBEDDING_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_EMBEDDING_CACHE_SIZE: u64 = 1_000;

// --- Retrieval ---
pub const DEFAULT_RESULT_LIMIT: usize = 5;
pub const DEFAULT_MAX_RESULT_LIMIT: usize = 50;
pub const DEFAULT_VECTOR_TOP_K: usize = 5;
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_ACTIVITIES_PER_COMPANY: usize = 10;

// --- Privacy ---
pub const DEFAULT_REDACT_INSTITUTIONAL_ID: bool = true;

// --- Composer ---
pub const DEFAULT_STRUCTURED_CONFIDENCE: f64 = 0.9;
pub const DEFAULT_HYBRID_CONFIDENCE: f64 = 0.75;
pub const DEFAULT_VECTOR_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_NO_DATA_CONFIDENCE: f64 = 0.3;
pub const DEFAULT_UNAVAILABLE_CONFIDENCE: f64 = 0.1;
pub const DEFAULT_POLISH_TIMEOUT_MS: u64 = 4_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
