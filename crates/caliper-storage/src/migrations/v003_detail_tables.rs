//! v003: detail rows owned by a file (raw records, stat measurements and
//! their values, class counts).

use rusqlite::Connection;

use caliper_core::errors::CaliperResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CaliperResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS raw_measurement_records (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            file_id    INTEGER NOT NULL
                REFERENCES measurement_files(id) ON DELETE CASCADE,
            item_id    INTEGER NOT NULL
                REFERENCES measurement_items(id) ON DELETE RESTRICT,
            measurable INTEGER NOT NULL DEFAULT 1,
            x_index    INTEGER NOT NULL,
            y_index    INTEGER NOT NULL,
            x_0        REAL NOT NULL,
            y_0        REAL NOT NULL,
            x_1        REAL NOT NULL,
            y_1        REAL NOT NULL,
            value      REAL NOT NULL,
            UNIQUE (file_id, item_id, x_index, y_index)
        );

        CREATE INDEX IF NOT EXISTS idx_raw_file
            ON raw_measurement_records(file_id);

        CREATE TABLE IF NOT EXISTS stat_measurements (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            file_id    INTEGER NOT NULL
                REFERENCES measurement_files(id) ON DELETE CASCADE,
            item_id    INTEGER NOT NULL
                REFERENCES measurement_items(id) ON DELETE RESTRICT,
            extra_json TEXT,
            UNIQUE (file_id, item_id)
        );

        CREATE INDEX IF NOT EXISTS idx_stat_file
            ON stat_measurements(file_id);

        CREATE TABLE IF NOT EXISTS stat_measurement_values (
            stat_measurement_id INTEGER NOT NULL
                REFERENCES stat_measurements(id) ON DELETE CASCADE,
            value_type_id       INTEGER NOT NULL
                REFERENCES stat_value_types(id) ON DELETE RESTRICT,
            value               REAL NOT NULL,
            PRIMARY KEY (stat_measurement_id, value_type_id)
        );

        CREATE TABLE IF NOT EXISTS file_class_counts (
            file_id  INTEGER NOT NULL
                REFERENCES measurement_files(id) ON DELETE CASCADE,
            class_id INTEGER NOT NULL
                REFERENCES detection_classes(id) ON DELETE RESTRICT,
            cnt      INTEGER NOT NULL,
            PRIMARY KEY (file_id, class_id)
        );
        ",
    )
    .map_err(to_storage_err)?;
    Ok(())
}
