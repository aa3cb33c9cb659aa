//! The single write connection, serialized behind a mutex.
//!
//! All mutation flows through this one connection, so SQLite never sees two
//! concurrent writers and a transaction opened here is exclusive by
//! construction.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use caliper_core::errors::CaliperResult;

use super::pragmas::apply_pragmas;
use crate::{storage_err, to_storage_err};

/// Owns the writer and hands it out one closure at a time.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open the write connection for the given database file.
    pub fn open(path: &Path) -> CaliperResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(to_storage_err)?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory write connection (for testing).
    pub fn open_in_memory() -> CaliperResult<Self> {
        let conn = Connection::open_in_memory().map_err(to_storage_err)?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure with exclusive access to the write connection.
    pub fn with_conn_sync<F, T>(&self, f: F) -> CaliperResult<T>
    where
        F: FnOnce(&Connection) -> CaliperResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| storage_err(format!("write connection lock poisoned: {e}")))?;
        f(&guard)
    }
}
