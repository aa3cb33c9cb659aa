//! Find-or-insert-then-replace for the file master record.

use rusqlite::Connection;

use caliper_core::errors::CaliperResult;
use caliper_core::measurement::FileDescriptor;
use caliper_storage::queries::file_ops::{self, FileDimensions};

use crate::resolver::DimensionCache;

/// Reconcile the file row for `fingerprint` inside the caller's transaction.
///
/// A new fingerprint inserts a fresh row. A known fingerprint keeps its id,
/// takes the descriptor's mutable fields, and has every dependent detail row
/// purged before the caller rewrites them. Both branches attach the resolved
/// location dimensions. Returns the file id.
pub fn reconcile_file(
    conn: &Connection,
    cache: &mut DimensionCache,
    file: &FileDescriptor,
    fingerprint: &str,
) -> CaliperResult<i64> {
    let dims = FileDimensions {
        node_id: cache.resolve_node(conn, file.node_name.as_deref())?,
        module_id: cache.resolve_module(conn, file.module_name.as_deref())?,
        version_id: cache.resolve_version(conn, file.version_name.as_deref())?,
        directory_id: cache.resolve_directory_path(
            conn,
            &[
                Some(file.parent_dir_0.as_str()),
                file.parent_dir_1.as_deref(),
                file.parent_dir_2.as_deref(),
            ],
        )?,
    };

    let file_id = match file_ops::find_by_fingerprint(conn, fingerprint)? {
        Some(existing) => {
            tracing::debug!(file_id = existing.id, fingerprint = %fingerprint, "replacing existing file");
            file_ops::update_file(conn, existing.id, file)?;
            file_ops::purge_details(conn, existing.id)?;
            existing.id
        }
        None => {
            let id = file_ops::insert_file(conn, file, Some(fingerprint))?;
            tracing::debug!(file_id = id, fingerprint = %fingerprint, "created new file");
            id
        }
    };

    file_ops::attach_dimensions(conn, file_id, fingerprint, dims)?;
    Ok(file_id)
}
