//! Master-record operations for measurement files: lookup by fingerprint,
//! insert, in-place update, dimension attachment, detail purge.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use caliper_core::errors::CaliperResult;
use caliper_core::measurement::{FileDescriptor, FileStatus, MeasurementFileRecord};

use crate::{storage_err, to_storage_err};

/// Resolved dimension ids to attach to a file row.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDimensions {
    pub node_id: Option<i64>,
    pub module_id: Option<i64>,
    pub version_id: Option<i64>,
    pub directory_id: Option<i64>,
}

const FILE_COLUMNS: &str = "id, post_time, file_path, file_name, file_hash, processing_ms,
     status, node_id, module_id, version_id, directory_id, created_at";

/// Find a file row by its content fingerprint.
pub fn find_by_fingerprint(
    conn: &Connection,
    fingerprint: &str,
) -> CaliperResult<Option<MeasurementFileRecord>> {
    conn.query_row(
        &format!("SELECT {FILE_COLUMNS} FROM measurement_files WHERE file_hash = ?1"),
        params![fingerprint],
        row_to_file,
    )
    .optional()
    .map_err(to_storage_err)?
    .transpose()
}

/// Insert a new file row. `file_hash` is passed separately so the pipeline
/// can store its computed fingerprint while the plain create passthrough
/// stores whatever the caller supplied.
pub fn insert_file(
    conn: &Connection,
    file: &FileDescriptor,
    file_hash: Option<&str>,
) -> CaliperResult<i64> {
    conn.execute(
        "INSERT INTO measurement_files
            (post_time, file_path, file_name, file_hash, processing_ms, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            file.post_time.to_rfc3339(),
            file.file_path,
            file.file_name,
            file_hash,
            file.processing_ms,
            file.status.as_str(),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(conn.last_insert_rowid())
}

/// Update the mutable descriptor fields of an existing file row in place.
pub fn update_file(conn: &Connection, id: i64, file: &FileDescriptor) -> CaliperResult<()> {
    conn.execute(
        "UPDATE measurement_files SET
            post_time = ?2, file_path = ?3, file_name = ?4,
            processing_ms = ?5, status = ?6
         WHERE id = ?1",
        params![
            id,
            file.post_time.to_rfc3339(),
            file.file_path,
            file.file_name,
            file.processing_ms,
            file.status.as_str(),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Attach the fingerprint and resolved dimension references to a file row.
pub fn attach_dimensions(
    conn: &Connection,
    id: i64,
    fingerprint: &str,
    dims: FileDimensions,
) -> CaliperResult<()> {
    conn.execute(
        "UPDATE measurement_files SET
            file_hash = ?2, node_id = ?3, module_id = ?4,
            version_id = ?5, directory_id = ?6
         WHERE id = ?1",
        params![
            id,
            fingerprint,
            dims.node_id,
            dims.module_id,
            dims.version_id,
            dims.directory_id,
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Delete every detail row owned by a file. Stat measurement values go with
/// their stat rows via FK cascade.
pub fn purge_details(conn: &Connection, file_id: i64) -> CaliperResult<()> {
    for table in &[
        "raw_measurement_records",
        "stat_measurements",
        "file_class_counts",
    ] {
        conn.execute(
            &format!("DELETE FROM {table} WHERE file_id = ?1"),
            params![file_id],
        )
        .map_err(to_storage_err)?;
    }
    Ok(())
}

/// Get a single file row by id.
pub fn get_file(conn: &Connection, id: i64) -> CaliperResult<Option<MeasurementFileRecord>> {
    conn.query_row(
        &format!("SELECT {FILE_COLUMNS} FROM measurement_files WHERE id = ?1"),
        params![id],
        row_to_file,
    )
    .optional()
    .map_err(to_storage_err)?
    .transpose()
}

/// List all file rows, oldest first.
pub fn list_files(conn: &Connection) -> CaliperResult<Vec<MeasurementFileRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {FILE_COLUMNS} FROM measurement_files ORDER BY id"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map([], row_to_file)
        .map_err(to_storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_storage_err)?;
    rows.into_iter().collect()
}

/// Parse a row from measurement_files into a record.
fn row_to_file(row: &rusqlite::Row<'_>) -> rusqlite::Result<CaliperResult<MeasurementFileRecord>> {
    let post_time_str: String = row.get(1)?;
    let status_str: String = row.get(6)?;
    let created_at_str: String = row.get(11)?;

    let parse_dt = |s: &str| -> CaliperResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| storage_err(format!("parse datetime '{s}': {e}")))
    };

    let build = || -> CaliperResult<MeasurementFileRecord> {
        Ok(MeasurementFileRecord {
            id: row.get(0).map_err(|e| storage_err(e.to_string()))?,
            post_time: parse_dt(&post_time_str)?,
            file_path: row.get(2).map_err(|e| storage_err(e.to_string()))?,
            file_name: row.get(3).map_err(|e| storage_err(e.to_string()))?,
            file_hash: row.get(4).map_err(|e| storage_err(e.to_string()))?,
            processing_ms: row.get(5).map_err(|e| storage_err(e.to_string()))?,
            status: FileStatus::parse(&status_str)
                .ok_or_else(|| storage_err(format!("unknown file status '{status_str}'")))?,
            node_id: row.get(7).map_err(|e| storage_err(e.to_string()))?,
            module_id: row.get(8).map_err(|e| storage_err(e.to_string()))?,
            version_id: row.get(9).map_err(|e| storage_err(e.to_string()))?,
            directory_id: row.get(10).map_err(|e| storage_err(e.to_string()))?,
            created_at: parse_dt(&created_at_str)?,
        })
    };
    Ok(build())
}
