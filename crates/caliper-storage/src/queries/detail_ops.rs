//! Detail rows owned by a file: raw records, stat measurements with their
//! value rows, and per-class counts.

use rusqlite::{params, Connection};

use caliper_core::errors::CaliperResult;
use caliper_core::measurement::{
    ClassCountRecord, NewRawRecord, NewStatMeasurement, RawMeasurementRecord,
    StatMeasurementRecord, StatValueRecord,
};

use crate::{storage_err, to_storage_err};

/// Insert one raw measurement record, returning its id.
pub fn insert_raw_record(conn: &Connection, record: &NewRawRecord) -> CaliperResult<i64> {
    conn.execute(
        "INSERT INTO raw_measurement_records
            (file_id, item_id, measurable, x_index, y_index, x_0, y_0, x_1, y_1, value)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            record.file_id,
            record.item_id,
            record.measurable as i32,
            record.x_index,
            record.y_index,
            record.x_0,
            record.y_0,
            record.x_1,
            record.y_1,
            record.value,
        ],
    )
    .map_err(to_storage_err)?;
    Ok(conn.last_insert_rowid())
}

const RAW_COLUMNS: &str =
    "id, file_id, item_id, measurable, x_index, y_index, x_0, y_0, x_1, y_1, value";

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawMeasurementRecord> {
    Ok(RawMeasurementRecord {
        id: row.get(0)?,
        file_id: row.get(1)?,
        item_id: row.get(2)?,
        measurable: row.get::<_, i32>(3)? != 0,
        x_index: row.get(4)?,
        y_index: row.get(5)?,
        x_0: row.get(6)?,
        y_0: row.get(7)?,
        x_1: row.get(8)?,
        y_1: row.get(9)?,
        value: row.get(10)?,
    })
}

/// List all raw records, oldest first.
pub fn list_raw_records(conn: &Connection) -> CaliperResult<Vec<RawMeasurementRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {RAW_COLUMNS} FROM raw_measurement_records ORDER BY id"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map([], row_to_raw)
        .map_err(to_storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_storage_err);
    rows
}

/// Raw records belonging to one file.
pub fn raw_records_for_file(
    conn: &Connection,
    file_id: i64,
) -> CaliperResult<Vec<RawMeasurementRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {RAW_COLUMNS} FROM raw_measurement_records WHERE file_id = ?1 ORDER BY id"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![file_id], row_to_raw)
        .map_err(to_storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_storage_err);
    rows
}

/// Insert one stat measurement and its value rows, returning the stat id.
/// Value-type references must already be resolved.
pub fn insert_stat_measurement(
    conn: &Connection,
    measurement: &NewStatMeasurement,
) -> CaliperResult<i64> {
    let extra_json = measurement
        .extra_json
        .as_ref()
        .map(|v| serde_json::to_string(v).map_err(|e| storage_err(e.to_string())))
        .transpose()?;

    conn.execute(
        "INSERT INTO stat_measurements (file_id, item_id, extra_json) VALUES (?1, ?2, ?3)",
        params![measurement.file_id, measurement.item_id, extra_json],
    )
    .map_err(to_storage_err)?;
    let stat_id = conn.last_insert_rowid();

    for value in &measurement.values {
        insert_stat_value(conn, stat_id, value.value_type_id, value.value)?;
    }
    Ok(stat_id)
}

/// Insert one (stat measurement, value type) value row.
pub fn insert_stat_value(
    conn: &Connection,
    stat_id: i64,
    value_type_id: i64,
    value: f64,
) -> CaliperResult<()> {
    conn.execute(
        "INSERT INTO stat_measurement_values (stat_measurement_id, value_type_id, value)
         VALUES (?1, ?2, ?3)",
        params![stat_id, value_type_id, value],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

fn row_to_stat(row: &rusqlite::Row<'_>) -> rusqlite::Result<StatMeasurementRecord> {
    let extra_raw: Option<String> = row.get(3)?;
    Ok(StatMeasurementRecord {
        id: row.get(0)?,
        file_id: row.get(1)?,
        item_id: row.get(2)?,
        extra_json: extra_raw.and_then(|raw| serde_json::from_str(&raw).ok()),
        values: Vec::new(),
    })
}

/// Load the value rows for a stat measurement, ordered by value type.
fn load_stat_values(conn: &Connection, stat_id: i64) -> CaliperResult<Vec<StatValueRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT value_type_id, value FROM stat_measurement_values
             WHERE stat_measurement_id = ?1 ORDER BY value_type_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![stat_id], |row| {
            Ok(StatValueRecord {
                value_type_id: row.get(0)?,
                value: row.get(1)?,
            })
        })
        .map_err(to_storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_storage_err);
    rows
}

fn stats_from_stmt(
    conn: &Connection,
    mut stmt: rusqlite::Statement<'_>,
    bind: &[&dyn rusqlite::ToSql],
) -> CaliperResult<Vec<StatMeasurementRecord>> {
    let mut stats = stmt
        .query_map(bind, row_to_stat)
        .map_err(to_storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_storage_err)?;
    for stat in &mut stats {
        stat.values = load_stat_values(conn, stat.id)?;
    }
    Ok(stats)
}

/// List all stat measurements with their values, oldest first.
pub fn list_stat_measurements(conn: &Connection) -> CaliperResult<Vec<StatMeasurementRecord>> {
    let stmt = conn
        .prepare("SELECT id, file_id, item_id, extra_json FROM stat_measurements ORDER BY id")
        .map_err(to_storage_err)?;
    stats_from_stmt(conn, stmt, &[])
}

/// Stat measurements belonging to one file, with their values.
pub fn stat_measurements_for_file(
    conn: &Connection,
    file_id: i64,
) -> CaliperResult<Vec<StatMeasurementRecord>> {
    let stmt = conn
        .prepare(
            "SELECT id, file_id, item_id, extra_json FROM stat_measurements
             WHERE file_id = ?1 ORDER BY id",
        )
        .map_err(to_storage_err)?;
    stats_from_stmt(conn, stmt, &[&file_id])
}

/// Set the count for (file, class), inserting or updating as needed.
pub fn upsert_class_count(
    conn: &Connection,
    file_id: i64,
    class_id: i64,
    count: i64,
) -> CaliperResult<()> {
    conn.execute(
        "INSERT INTO file_class_counts (file_id, class_id, cnt) VALUES (?1, ?2, ?3)
         ON CONFLICT(file_id, class_id) DO UPDATE SET cnt = excluded.cnt",
        params![file_id, class_id, count],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Class counts for one file, joined back to class names.
pub fn class_counts_for_file(
    conn: &Connection,
    file_id: i64,
) -> CaliperResult<Vec<ClassCountRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT c.name, fcc.cnt
             FROM file_class_counts fcc
             JOIN detection_classes c ON c.id = fcc.class_id
             WHERE fcc.file_id = ?1
             ORDER BY c.name",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![file_id], |row| {
            Ok(ClassCountRecord {
                class_name: row.get(0)?,
                count: row.get(1)?,
            })
        })
        .map_err(to_storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_storage_err);
    rows
}
