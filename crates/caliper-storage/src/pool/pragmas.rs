//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL mode, NORMAL sync, 5s busy_timeout, foreign_keys ON. Foreign keys must
//! be on for the file-to-detail cascade and the dimension RESTRICT rules.

use rusqlite::Connection;

use caliper_core::errors::CaliperResult;

use crate::to_storage_err;

/// Apply all performance and safety pragmas to the write connection.
pub fn apply_pragmas(conn: &Connection) -> CaliperResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Pragmas for read connections. Journal mode is owned by the writer; a
/// read-only connection may not change it.
pub fn apply_read_pragmas(conn: &Connection) -> CaliperResult<()> {
    conn.execute_batch(
        "
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> CaliperResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(to_storage_err)?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
