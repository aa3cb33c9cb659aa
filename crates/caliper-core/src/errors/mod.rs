//! Error taxonomy: per-area enums aggregated into [`CaliperError`].

pub mod ingest_error;
pub mod storage_error;

pub use ingest_error::IngestError;
pub use storage_error::StorageError;

/// Top-level error type for all Caliper operations.
#[derive(Debug, thiserror::Error)]
pub enum CaliperError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("config error: {0}")]
    Config(String),
}

impl CaliperError {
    /// Whether the caller may safely retry the whole operation.
    /// Lock timeouts performed no writes; transport failures rolled back.
    pub fn is_retryable(&self) -> bool {
        match self {
            CaliperError::Ingest(IngestError::LockTimeout { .. }) => true,
            CaliperError::Storage(StorageError::Sqlite { .. }) => true,
            _ => false,
        }
    }
}

/// Result alias used throughout the workspace.
pub type CaliperResult<T> = Result<T, CaliperError>;
