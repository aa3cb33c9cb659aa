//! v001: flat dimensions, directory tree, metric types, items, value types,
//! detection classes.

use rusqlite::Connection;

use caliper_core::errors::CaliperResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CaliperResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS measurement_nodes (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            name      TEXT NOT NULL UNIQUE,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS measurement_modules (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            name      TEXT NOT NULL UNIQUE,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS measurement_versions (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            name      TEXT NOT NULL UNIQUE,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS measurement_directories (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            parent_id INTEGER REFERENCES measurement_directories(id) ON DELETE RESTRICT,
            name      TEXT NOT NULL
        );

        -- Roots have NULL parents; COALESCE folds them into the same key
        -- space so two same-named roots collapse to one row.
        CREATE UNIQUE INDEX IF NOT EXISTS uk_directories_parent_name
            ON measurement_directories(COALESCE(parent_id, 0), name);

        CREATE TABLE IF NOT EXISTS measurement_metric_types (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            name      TEXT NOT NULL UNIQUE,
            unit      TEXT,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS measurement_items (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            class_name       TEXT NOT NULL,
            measure_item_key TEXT NOT NULL,
            metric_type_id   INTEGER NOT NULL
                REFERENCES measurement_metric_types(id) ON DELETE RESTRICT,
            is_active        INTEGER NOT NULL DEFAULT 1,
            UNIQUE (class_name, measure_item_key, metric_type_id)
        );

        CREATE INDEX IF NOT EXISTS idx_items_metric_type
            ON measurement_items(metric_type_id);

        CREATE TABLE IF NOT EXISTS stat_value_types (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            name      TEXT NOT NULL UNIQUE,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS detection_classes (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            name      TEXT NOT NULL UNIQUE,
            is_active INTEGER NOT NULL DEFAULT 1
        );
        ",
    )
    .map_err(to_storage_err)?;
    Ok(())
}
