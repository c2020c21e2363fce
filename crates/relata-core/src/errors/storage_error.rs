/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("data integrity anomaly in {table} row {row_id}: {details}")]
    IntegrityAnomaly {
        table: String,
        row_id: i64,
        details: String,
    },
}
