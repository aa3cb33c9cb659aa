//! Forward-only schema migrations, tracked via `PRAGMA user_version`.

mod v001_dimension_tables;
mod v002_file_tables;
mod v003_detail_tables;

use rusqlite::Connection;

use caliper_core::errors::{CaliperResult, StorageError};

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> CaliperResult<()>;

const MIGRATIONS: &[(u32, MigrationFn)] = &[
    (1, v001_dimension_tables::migrate),
    (2, v002_file_tables::migrate),
    (3, v003_detail_tables::migrate),
];

/// Apply every migration newer than the database's current version.
pub fn run_migrations(conn: &Connection) -> CaliperResult<()> {
    let current: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(to_storage_err)?;

    for (version, migrate) in MIGRATIONS {
        if i64::from(*version) <= current {
            continue;
        }
        tracing::info!(version = *version, "applying schema migration");
        migrate(conn).map_err(|e| StorageError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        })?;
        conn.pragma_update(None, "user_version", *version)
            .map_err(to_storage_err)?;
    }
    Ok(())
}
