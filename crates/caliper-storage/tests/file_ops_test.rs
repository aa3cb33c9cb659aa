//! File master-record operations: fingerprint lookup, in-place update,
//! detail purge, and FK rules.

use chrono::{TimeZone, Utc};

use caliper_core::errors::{CaliperError, StorageError};
use caliper_core::measurement::{
    FileDescriptor, FileStatus, NewRawRecord, NewStatMeasurement, StatValueRecord,
};
use caliper_storage::queries::{detail_ops, dimension_ops, file_ops};
use caliper_storage::StorageEngine;

fn descriptor(name: &str) -> FileDescriptor {
    FileDescriptor {
        post_time: Utc.with_ymd_and_hms(2024, 5, 20, 8, 0, 0).unwrap(),
        file_path: format!("/data/img/{name}"),
        parent_dir_0: "img".to_string(),
        parent_dir_1: None,
        parent_dir_2: None,
        file_name: name.to_string(),
        node_name: None,
        module_name: None,
        version_name: None,
        file_hash: None,
        processing_ms: Some(1520),
        status: FileStatus::Ok,
    }
}

#[test]
fn insert_then_find_by_fingerprint() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .with_writer(|conn| {
            let id = file_ops::insert_file(conn, &descriptor("run1.csv"), Some("abc123"))?;
            let found = file_ops::find_by_fingerprint(conn, "abc123")?
                .expect("inserted file should be found");
            assert_eq!(found.id, id);
            assert_eq!(found.file_name, "run1.csv");
            assert_eq!(found.status, FileStatus::Ok);
            assert!(file_ops::find_by_fingerprint(conn, "other")?.is_none());
            Ok(())
        })
        .unwrap();
}

#[test]
fn duplicate_fingerprint_is_a_constraint_violation() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let err = engine
        .with_writer(|conn| {
            file_ops::insert_file(conn, &descriptor("run1.csv"), Some("abc123"))?;
            file_ops::insert_file(conn, &descriptor("run2.csv"), Some("abc123"))?;
            Ok(())
        })
        .unwrap_err();
    match err {
        CaliperError::Storage(StorageError::ConstraintViolation { .. }) => {}
        other => panic!("expected constraint violation, got {other}"),
    }
}

#[test]
fn update_keeps_id_and_created_at_semantics() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .with_writer(|conn| {
            let id = file_ops::insert_file(conn, &descriptor("run1.csv"), Some("abc123"))?;
            let mut changed = descriptor("run1.csv");
            changed.processing_ms = Some(9999);
            changed.status = FileStatus::Fail;
            file_ops::update_file(conn, id, &changed)?;

            let found = file_ops::get_file(conn, id)?.expect("file should exist");
            assert_eq!(found.id, id);
            assert_eq!(found.processing_ms, Some(9999));
            assert_eq!(found.status, FileStatus::Fail);
            Ok(())
        })
        .unwrap();
}

#[test]
fn purge_removes_all_detail_rows_including_stat_values() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .with_writer(|conn| {
            let file_id = file_ops::insert_file(conn, &descriptor("run1.csv"), Some("abc123"))?;
            let metric = dimension_ops::resolve_metric_type(conn, "CD", Some("nm"))?;
            let item = dimension_ops::resolve_item(conn, "P1", "VERTICAL_CD", metric)?;
            let avg = dimension_ops::resolve_value_type(conn, "AVG")?;
            let class = dimension_ops::resolve_class(conn, "P1")?;

            detail_ops::insert_raw_record(
                conn,
                &NewRawRecord {
                    file_id,
                    item_id: item,
                    measurable: true,
                    x_index: 3,
                    y_index: 5,
                    x_0: 12.5,
                    y_0: 8.0,
                    x_1: 13.0,
                    y_1: 8.6,
                    value: 31.27,
                },
            )?;
            detail_ops::insert_stat_measurement(
                conn,
                &NewStatMeasurement {
                    file_id,
                    item_id: item,
                    extra_json: None,
                    values: vec![StatValueRecord {
                        value_type_id: avg,
                        value: 31.27,
                    }],
                },
            )?;
            detail_ops::upsert_class_count(conn, file_id, class, 500)?;

            file_ops::purge_details(conn, file_id)?;

            let leftovers: i64 = conn
                .query_row(
                    "SELECT (SELECT COUNT(*) FROM raw_measurement_records)
                          + (SELECT COUNT(*) FROM stat_measurements)
                          + (SELECT COUNT(*) FROM stat_measurement_values)
                          + (SELECT COUNT(*) FROM file_class_counts)",
                    [],
                    |row| row.get(0),
                )
                .map_err(|e| StorageError::Sqlite {
                    message: e.to_string(),
                })?;
            assert_eq!(leftovers, 0, "purge must leave no detail rows behind");

            // Dimension rows survive the purge.
            let dims: i64 = conn
                .query_row(
                    "SELECT (SELECT COUNT(*) FROM measurement_items)
                          + (SELECT COUNT(*) FROM stat_value_types)
                          + (SELECT COUNT(*) FROM detection_classes)",
                    [],
                    |row| row.get(0),
                )
                .map_err(|e| StorageError::Sqlite {
                    message: e.to_string(),
                })?;
            assert_eq!(dims, 3);
            Ok(())
        })
        .unwrap();
}

#[test]
fn dimension_in_use_cannot_be_deleted() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let err = engine
        .with_writer(|conn| {
            let file_id = file_ops::insert_file(conn, &descriptor("run1.csv"), Some("abc123"))?;
            let metric = dimension_ops::resolve_metric_type(conn, "CD", Some("nm"))?;
            let item = dimension_ops::resolve_item(conn, "P1", "VERTICAL_CD", metric)?;
            detail_ops::insert_raw_record(
                conn,
                &NewRawRecord {
                    file_id,
                    item_id: item,
                    measurable: true,
                    x_index: 0,
                    y_index: 0,
                    x_0: 0.0,
                    y_0: 0.0,
                    x_1: 0.0,
                    y_1: 0.0,
                    value: 1.0,
                },
            )?;
            conn.execute("DELETE FROM measurement_items WHERE id = ?1", [item])
                .map_err(|e| StorageError::Sqlite {
                    message: e.to_string(),
                })?;
            Ok(())
        })
        .unwrap_err();
    assert!(
        err.to_string().to_lowercase().contains("constraint"),
        "delete of an in-use dimension must hit the FK restrict rule: {err}"
    );
}
