//! # relata-storage
//!
//! SQLite persistence for the report corpus: connection pool, pragmas, migrations,
//! parameterized aggregation queries, and a pre-filtered nearest-section scan.
//! Implements `IReportStore` from relata-core. Reads never open write transactions.

pub mod engine;
pub mod ingest;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;
pub use ingest::IngestOutcome;

use relata_core::errors::{RelataError, StorageError};

/// Wrap a SQLite failure message.
pub(crate) fn to_storage_err(message: String) -> RelataError {
    StorageError::SqliteError { message }.into()
}
