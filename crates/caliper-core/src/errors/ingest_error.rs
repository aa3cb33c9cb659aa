/// Ingestion-pipeline errors raised before or around the storage transaction.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid payload field {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("ingestion lock not acquired for {key} within {waited_ms}ms")]
    LockTimeout { key: String, waited_ms: u64 },
}
