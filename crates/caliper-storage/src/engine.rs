//! StorageEngine — owns ConnectionPool, implements IMeasurementStorage,
//! startup migrations, read/write routing.

use std::path::Path;

use caliper_core::config::StorageConfig;
use caliper_core::errors::CaliperResult;
use caliper_core::measurement::{
    ClassCountRecord, FileDescriptor, MeasurementFileRecord, NewRawRecord, NewStatMeasurement,
    RawMeasurementRecord, StatMeasurementRecord,
};
use caliper_core::traits::IMeasurementStorage;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::storage_err;

/// The main storage engine. Owns the connection pool and provides the
/// record-level storage interface plus direct writer access for callers
/// that need to span one transaction (the ingestion pipeline).
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed mode).
    /// When false, route all reads through the writer (in-memory mode,
    /// because in-memory read pool connections are isolated databases).
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> CaliperResult<Self> {
        let pool = ConnectionPool::open(path, crate::pool::ReadPool::default_size())?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing).
    /// Routes all reads through the writer since in-memory read pool
    /// connections are isolated databases that can't see writer's changes.
    pub fn open_in_memory() -> CaliperResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open according to configuration: file-backed when a path is set,
    /// in-memory otherwise.
    pub fn from_config(config: &StorageConfig) -> CaliperResult<Self> {
        match &config.db_path {
            Some(path) => {
                let pool = ConnectionPool::open(path, config.read_pool_size)?;
                let engine = Self {
                    pool,
                    use_read_pool: true,
                };
                engine.initialize()?;
                Ok(engine)
            }
            None => Self::open_in_memory(),
        }
    }

    /// Run migrations.
    fn initialize(&self) -> CaliperResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    /// Get a reference to the connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Execute a closure with exclusive access to the write connection.
    /// Transaction scope is the caller's responsibility.
    pub fn with_writer<F, T>(&self, f: F) -> CaliperResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> CaliperResult<T>,
    {
        self.pool.writer.with_conn_sync(f)
    }

    /// Execute a read-only query on the best available connection.
    /// File-backed: uses the read pool (no writer contention).
    /// In-memory: uses the writer (read pool is isolated).
    fn with_reader<F, T>(&self, f: F) -> CaliperResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> CaliperResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }
}

impl IMeasurementStorage for StorageEngine {
    fn list_files(&self) -> CaliperResult<Vec<MeasurementFileRecord>> {
        self.with_reader(crate::queries::file_ops::list_files)
    }

    fn get_file(&self, id: i64) -> CaliperResult<Option<MeasurementFileRecord>> {
        self.with_reader(|conn| crate::queries::file_ops::get_file(conn, id))
    }

    fn get_file_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> CaliperResult<Option<MeasurementFileRecord>> {
        self.with_reader(|conn| crate::queries::file_ops::find_by_fingerprint(conn, fingerprint))
    }

    fn create_file(&self, file: &FileDescriptor) -> CaliperResult<MeasurementFileRecord> {
        self.pool.writer.with_conn_sync(|conn| {
            let id = crate::queries::file_ops::insert_file(conn, file, file.file_hash.as_deref())?;
            crate::queries::file_ops::get_file(conn, id)?
                .ok_or_else(|| storage_err(format!("file {id} vanished after insert")))
        })
    }

    fn list_raw_records(&self) -> CaliperResult<Vec<RawMeasurementRecord>> {
        self.with_reader(crate::queries::detail_ops::list_raw_records)
    }

    fn raw_records_for_file(&self, file_id: i64) -> CaliperResult<Vec<RawMeasurementRecord>> {
        self.with_reader(|conn| crate::queries::detail_ops::raw_records_for_file(conn, file_id))
    }

    fn create_raw_record(&self, record: &NewRawRecord) -> CaliperResult<RawMeasurementRecord> {
        self.pool.writer.with_conn_sync(|conn| {
            let id = crate::queries::detail_ops::insert_raw_record(conn, record)?;
            Ok(RawMeasurementRecord {
                id,
                file_id: record.file_id,
                item_id: record.item_id,
                measurable: record.measurable,
                x_index: record.x_index,
                y_index: record.y_index,
                x_0: record.x_0,
                y_0: record.y_0,
                x_1: record.x_1,
                y_1: record.y_1,
                value: record.value,
            })
        })
    }

    fn list_stat_measurements(&self) -> CaliperResult<Vec<StatMeasurementRecord>> {
        self.with_reader(crate::queries::detail_ops::list_stat_measurements)
    }

    fn stat_measurements_for_file(
        &self,
        file_id: i64,
    ) -> CaliperResult<Vec<StatMeasurementRecord>> {
        self.with_reader(|conn| {
            crate::queries::detail_ops::stat_measurements_for_file(conn, file_id)
        })
    }

    fn create_stat_measurement(
        &self,
        measurement: &NewStatMeasurement,
    ) -> CaliperResult<StatMeasurementRecord> {
        self.pool.writer.with_conn_sync(|conn| {
            let tx = conn.unchecked_transaction().map_err(crate::to_storage_err)?;
            let result =
                crate::queries::detail_ops::insert_stat_measurement(&tx, measurement);
            match result {
                Ok(id) => {
                    tx.commit().map_err(crate::to_storage_err)?;
                    Ok(StatMeasurementRecord {
                        id,
                        file_id: measurement.file_id,
                        item_id: measurement.item_id,
                        extra_json: measurement.extra_json.clone(),
                        values: measurement.values.clone(),
                    })
                }
                Err(e) => {
                    let _ = tx.rollback();
                    Err(e)
                }
            }
        })
    }

    fn class_counts_for_file(&self, file_id: i64) -> CaliperResult<Vec<ClassCountRecord>> {
        self.with_reader(|conn| crate::queries::detail_ops::class_counts_for_file(conn, file_id))
    }
}
