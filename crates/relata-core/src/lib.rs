//! # relata-core
//!
//! Foundation crate for the Relata report engine.
//! Defines the report data model, intents, retrieval results, errors, config, and the
//! collaborator traits every other crate in the workspace builds on.

pub mod config;
pub mod constants;
pub mod errors;
pub mod intent;
pub mod report;
pub mod retrieval;
pub mod terms;
pub mod text;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::RelataConfig;
pub use errors::{RelataError, RelataResult};
pub use intent::{Classification, Direction, Intent, QueryParams};
pub use report::{AcademicYear, ProgramTrack, Report, ReportMetadata, TermCode};
pub use retrieval::{Answer, Branch, Evidence, Fact, RetrievalResult};
pub use terms::{SectionKind, TechnicalTerm, TermCategory};
