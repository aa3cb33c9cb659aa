//! Writes a payload's detail rows, routing every reference through the
//! shared per-call dimension cache.

use rusqlite::Connection;

use caliper_core::errors::CaliperResult;
use caliper_core::measurement::{IngestPayload, NewRawRecord, NewStatMeasurement, StatValueRecord};
use caliper_storage::queries::detail_ops;

use crate::resolver::DimensionCache;

/// Insert all raw records, stat measurements (+ values), and class counts
/// for `file_id`. Returns (raw count, stat count).
pub fn write_details(
    conn: &Connection,
    cache: &mut DimensionCache,
    file_id: i64,
    payload: &IngestPayload,
) -> CaliperResult<(usize, usize)> {
    let mut raw_count = 0;
    let mut stat_count = 0;

    for entry in &payload.raw_measurements {
        let item_id = cache.resolve_item(conn, &entry.item)?;
        detail_ops::insert_raw_record(
            conn,
            &NewRawRecord {
                file_id,
                item_id,
                measurable: entry.measurable,
                x_index: entry.x_index,
                y_index: entry.y_index,
                x_0: entry.x_0,
                y_0: entry.y_0,
                x_1: entry.x_1,
                y_1: entry.y_1,
                value: entry.value,
            },
        )?;
        raw_count += 1;
    }

    for entry in &payload.stat_measurements {
        let item_id = cache.resolve_item(conn, &entry.item)?;
        let mut values = Vec::with_capacity(entry.values.len());
        for value in &entry.values {
            let value_type_id = cache.resolve_value_type(conn, &value.value_type_name)?;
            values.push(StatValueRecord {
                value_type_id,
                value: value.value,
            });
        }
        detail_ops::insert_stat_measurement(
            conn,
            &NewStatMeasurement {
                file_id,
                item_id,
                extra_json: entry.extra_json.clone(),
                values,
            },
        )?;
        stat_count += 1;
    }

    for (class_name, count) in &payload.class_counts {
        let class_id = cache.resolve_class(conn, class_name)?;
        detail_ops::upsert_class_count(conn, file_id, class_id, *count)?;
    }

    Ok((raw_count, stat_count))
}
