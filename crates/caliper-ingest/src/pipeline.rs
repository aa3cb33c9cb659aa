//! Pipeline orchestration: validate, lock, then one transaction covering
//! dimension resolution, file reconciliation, and detail writes.

use std::sync::Arc;
use std::time::Duration;

use caliper_core::config::IngestConfig;
use caliper_core::errors::CaliperResult;
use caliper_core::measurement::{IngestPayload, IngestSummary};
use caliper_storage::queries::file_ops;
use caliper_storage::StorageEngine;

use crate::details::write_details;
use crate::fingerprint::{file_fingerprint, ingest_lock_key};
use crate::lock::IngestLockRegistry;
use crate::reconcile::reconcile_file;
use crate::resolver::DimensionCache;

/// Drives ingestion calls to completion. One instance serves all handlers;
/// the lock registry inside it is what serializes same-fingerprint calls.
pub struct IngestPipeline {
    engine: Arc<StorageEngine>,
    locks: IngestLockRegistry,
    lock_timeout: Duration,
}

impl IngestPipeline {
    pub fn new(engine: Arc<StorageEngine>) -> Self {
        Self::with_config(engine, &IngestConfig::default())
    }

    pub fn with_config(engine: Arc<StorageEngine>, config: &IngestConfig) -> Self {
        Self {
            engine,
            locks: IngestLockRegistry::new(),
            lock_timeout: config.lock_timeout(),
        }
    }

    /// The keyed lock registry serializing same-fingerprint calls.
    pub fn lock_registry(&self) -> &IngestLockRegistry {
        &self.locks
    }

    /// Ingest one file's payload.
    ///
    /// Validation happens before the lock, so malformed requests never
    /// contend. After the lock is held, all writes run in one transaction on
    /// the write connection: an error at any point rolls everything back and
    /// the lock guard releases on the way out regardless of outcome.
    pub fn ingest(&self, payload: &IngestPayload) -> CaliperResult<IngestSummary> {
        payload.validate()?;

        let fingerprint = file_fingerprint(&payload.file);
        let lock_key = ingest_lock_key(&fingerprint);
        let _guard = self.locks.acquire(&lock_key, self.lock_timeout)?;
        tracing::debug!(fingerprint = %fingerprint, "ingestion lock acquired");

        let summary = self.engine.with_writer(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| caliper_core::errors::StorageError::Sqlite {
                    message: format!("ingest begin: {e}"),
                })?;

            match run_ingest(&tx, payload, &fingerprint) {
                Ok(summary) => {
                    tx.commit()
                        .map_err(|e| caliper_core::errors::StorageError::Sqlite {
                            message: format!("ingest commit: {e}"),
                        })?;
                    Ok(summary)
                }
                Err(e) => {
                    let _ = tx.rollback();
                    Err(e)
                }
            }
        })?;

        tracing::info!(
            file_id = summary.file.id,
            raw_records = summary.raw_records,
            stat_measurements = summary.stat_measurements,
            "ingestion committed"
        );
        Ok(summary)
    }
}

/// The transactional body: resolve, reconcile, write details, read back.
fn run_ingest(
    conn: &rusqlite::Connection,
    payload: &IngestPayload,
    fingerprint: &str,
) -> CaliperResult<IngestSummary> {
    let mut cache = DimensionCache::new();

    let file_id = reconcile_file(conn, &mut cache, &payload.file, fingerprint)?;
    let (raw_records, stat_measurements) = write_details(conn, &mut cache, file_id, payload)?;

    let file = file_ops::get_file(conn, file_id)?.ok_or_else(|| {
        caliper_core::errors::StorageError::Sqlite {
            message: format!("file {file_id} vanished mid-transaction"),
        }
    })?;

    Ok(IngestSummary {
        file,
        raw_records,
        stat_measurements,
    })
}
