//! Insert-or-fetch for dimension rows.
//!
//! Every resolver runs an `INSERT OR IGNORE` followed by a `SELECT` of the id
//! by natural key. The select is deliberate: `last_insert_rowid()` is stale
//! when the insert was an ignored duplicate. The unique constraint absorbs the
//! race where two connections introduce the same new value concurrently.

use rusqlite::{params, Connection};

use caliper_core::errors::CaliperResult;

use crate::to_storage_err;

/// Resolve a flat name-keyed dimension row in the given table.
fn resolve_named(conn: &Connection, table: &str, name: &str) -> CaliperResult<i64> {
    conn.execute(
        &format!("INSERT OR IGNORE INTO {table} (name) VALUES (?1)"),
        params![name],
    )
    .map_err(to_storage_err)?;
    conn.query_row(
        &format!("SELECT id FROM {table} WHERE name = ?1"),
        params![name],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

pub fn resolve_node(conn: &Connection, name: &str) -> CaliperResult<i64> {
    resolve_named(conn, "measurement_nodes", name)
}

pub fn resolve_module(conn: &Connection, name: &str) -> CaliperResult<i64> {
    resolve_named(conn, "measurement_modules", name)
}

pub fn resolve_version(conn: &Connection, name: &str) -> CaliperResult<i64> {
    resolve_named(conn, "measurement_versions", name)
}

pub fn resolve_value_type(conn: &Connection, name: &str) -> CaliperResult<i64> {
    resolve_named(conn, "stat_value_types", name)
}

pub fn resolve_class(conn: &Connection, name: &str) -> CaliperResult<i64> {
    resolve_named(conn, "detection_classes", name)
}

/// Resolve a metric type by name. The unit is stored at first sight and left
/// untouched on later references to the same name.
pub fn resolve_metric_type(
    conn: &Connection,
    name: &str,
    unit: Option<&str>,
) -> CaliperResult<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO measurement_metric_types (name, unit) VALUES (?1, ?2)",
        params![name, unit],
    )
    .map_err(to_storage_err)?;
    conn.query_row(
        "SELECT id FROM measurement_metric_types WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

/// Resolve a measured item under an already-resolved metric type.
pub fn resolve_item(
    conn: &Connection,
    class_name: &str,
    measure_item_key: &str,
    metric_type_id: i64,
) -> CaliperResult<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO measurement_items (class_name, measure_item_key, metric_type_id)
         VALUES (?1, ?2, ?3)",
        params![class_name, measure_item_key, metric_type_id],
    )
    .map_err(to_storage_err)?;
    conn.query_row(
        "SELECT id FROM measurement_items
         WHERE class_name = ?1 AND measure_item_key = ?2 AND metric_type_id = ?3",
        params![class_name, measure_item_key, metric_type_id],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

/// Resolve one directory segment against its parent (None for a root).
/// `parent_id IS ?` matches NULL parents, so same-named roots deduplicate.
pub fn resolve_directory_segment(
    conn: &Connection,
    parent_id: Option<i64>,
    name: &str,
) -> CaliperResult<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO measurement_directories (parent_id, name) VALUES (?1, ?2)",
        params![parent_id, name],
    )
    .map_err(to_storage_err)?;
    conn.query_row(
        "SELECT id FROM measurement_directories WHERE parent_id IS ?1 AND name = ?2",
        params![parent_id, name],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}
