//! v002: measurement_files master table.

use rusqlite::Connection;

use caliper_core::errors::CaliperResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CaliperResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS measurement_files (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            post_time     TEXT NOT NULL,
            post_date     TEXT GENERATED ALWAYS AS (substr(post_time, 1, 10)) STORED,
            file_path     TEXT NOT NULL,
            file_name     TEXT NOT NULL,
            file_hash     TEXT UNIQUE,
            processing_ms INTEGER,
            status        TEXT NOT NULL DEFAULT 'OK',
            node_id       INTEGER REFERENCES measurement_nodes(id) ON DELETE RESTRICT,
            module_id     INTEGER REFERENCES measurement_modules(id) ON DELETE RESTRICT,
            version_id    INTEGER REFERENCES measurement_versions(id) ON DELETE RESTRICT,
            directory_id  INTEGER REFERENCES measurement_directories(id) ON DELETE RESTRICT,
            created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_files_post_date
            ON measurement_files(post_date);
        ",
    )
    .map_err(to_storage_err)?;
    Ok(())
}
