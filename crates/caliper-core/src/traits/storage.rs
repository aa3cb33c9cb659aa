use crate::errors::CaliperResult;
use crate::measurement::{
    ClassCountRecord, FileDescriptor, MeasurementFileRecord, NewRawRecord, NewStatMeasurement,
    RawMeasurementRecord, StatMeasurementRecord,
};

/// Record-level storage operations: file metadata plus the per-table
/// list/create passthroughs. The ingestion pipeline bypasses this trait and
/// drives the write connection directly so it can span one transaction.
pub trait IMeasurementStorage: Send + Sync {
    // --- Files ---
    fn list_files(&self) -> CaliperResult<Vec<MeasurementFileRecord>>;
    fn get_file(&self, id: i64) -> CaliperResult<Option<MeasurementFileRecord>>;
    fn get_file_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> CaliperResult<Option<MeasurementFileRecord>>;
    fn create_file(&self, file: &FileDescriptor) -> CaliperResult<MeasurementFileRecord>;

    // --- Raw measurement records ---
    fn list_raw_records(&self) -> CaliperResult<Vec<RawMeasurementRecord>>;
    fn raw_records_for_file(&self, file_id: i64) -> CaliperResult<Vec<RawMeasurementRecord>>;
    fn create_raw_record(&self, record: &NewRawRecord) -> CaliperResult<RawMeasurementRecord>;

    // --- Stat measurements ---
    fn list_stat_measurements(&self) -> CaliperResult<Vec<StatMeasurementRecord>>;
    fn stat_measurements_for_file(
        &self,
        file_id: i64,
    ) -> CaliperResult<Vec<StatMeasurementRecord>>;
    fn create_stat_measurement(
        &self,
        measurement: &NewStatMeasurement,
    ) -> CaliperResult<StatMeasurementRecord>;

    // --- Class counts ---
    fn class_counts_for_file(&self, file_id: i64) -> CaliperResult<Vec<ClassCountRecord>>;
}
