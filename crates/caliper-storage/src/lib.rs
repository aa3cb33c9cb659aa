//! # caliper-storage
//!
//! SQLite persistence for the Caliper measurement schema: connection pool,
//! versioned migrations, per-table query modules, and the [`StorageEngine`]
//! facade implementing the record-level storage trait.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use caliper_core::errors::{CaliperError, StorageError};

/// Map a rusqlite error onto the storage taxonomy. Constraint violations stay
/// distinguishable from transport failures so callers can tell an invariant
/// breach from a retryable outage.
pub(crate) fn to_storage_err(e: rusqlite::Error) -> CaliperError {
    if let rusqlite::Error::SqliteFailure(ref ffi_err, ref message) = e {
        if ffi_err.code == rusqlite::ErrorCode::ConstraintViolation {
            return StorageError::ConstraintViolation {
                message: message.clone().unwrap_or_else(|| e.to_string()),
            }
            .into();
        }
    }
    StorageError::Sqlite {
        message: e.to_string(),
    }
    .into()
}

/// Storage error from a non-rusqlite failure (poisoned lock, parse, etc.).
pub(crate) fn storage_err(message: impl Into<String>) -> CaliperError {
    StorageError::Sqlite {
        message: message.into(),
    }
    .into()
}
