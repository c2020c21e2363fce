use relata_core::errors::*;

#[test]
fn subsystem_errors_convert_into_relata_error() {
    let storage: RelataError = StorageError::SqliteError {
        message: "disk I/O error".into(),
    }
    .into();
    assert!(matches!(storage, RelataError::StorageError(_)));
    assert_eq!(storage.to_string(), "SQLite error: disk I/O error");

    let embedding: RelataError = EmbeddingError::DimensionMismatch {
        expected: 1536,
        actual: 768,
    }
    .into();
    assert_eq!(
        embedding.to_string(),
        "embedding has 768 dimensions, configured for 1536"
    );

    let retrieval: RelataError = RetrievalError::Timeout {
        operation: "term_ranking".into(),
        timeout_ms: 3000,
    }
    .into();
    assert_eq!(retrieval.to_string(), "term_ranking timed out after 3000ms");
}

#[test]
fn serde_errors_convert() {
    let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let relata: RelataError = err.into();
    assert!(matches!(relata, RelataError::SerializationError(_)));
}

#[test]
fn not_found_names_the_id() {
    let err = RelataError::ReportNotFound { id: 42 };
    assert_eq!(err.to_string(), "report not found: 42");
}
