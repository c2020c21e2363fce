mod embedding;
mod polisher;
mod sanitizer;
mod store;

pub use embedding::IEmbeddingProvider;
pub use polisher::IResponsePolisher;
pub use sanitizer::{ISanitizer, Redaction, SanitizedText};
pub use store::IReportStore;
