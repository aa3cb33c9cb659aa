//! Payload deserialization and validation rules.

use caliper_core::errors::{CaliperError, IngestError};
use caliper_core::measurement::{FileStatus, IngestPayload};

fn base_payload_json() -> serde_json::Value {
    serde_json::json!({
        "file": {
            "post_time": "2024-05-20T08:00:00Z",
            "file_path": "/data/line_a/20240520/img/wafer123/run1.csv",
            "parent_dir_0": "img",
            "parent_dir_1": "wafer123",
            "file_name": "run1.csv"
        }
    })
}

#[test]
fn minimal_payload_deserializes_with_defaults() {
    let payload: IngestPayload = serde_json::from_value(base_payload_json()).unwrap();
    assert_eq!(payload.file.status, FileStatus::Ok);
    assert!(payload.file.parent_dir_2.is_none());
    assert!(payload.raw_measurements.is_empty());
    assert!(payload.stat_measurements.is_empty());
    assert!(payload.class_counts.is_empty());
    payload.validate().unwrap();
}

#[test]
fn class_counts_accepts_map_form() {
    let mut json = base_payload_json();
    json["class_counts"] = serde_json::json!({"P1": 500, "P2": 170});
    let payload: IngestPayload = serde_json::from_value(json).unwrap();
    assert_eq!(payload.class_counts.get("P1"), Some(&500));
    assert_eq!(payload.class_counts.get("P2"), Some(&170));
}

#[test]
fn class_counts_accepts_list_form() {
    let mut json = base_payload_json();
    json["class_counts"] = serde_json::json!([
        {"class_name": "P1", "count": 500},
        {"class_name": "P2", "count": 170}
    ]);
    let payload: IngestPayload = serde_json::from_value(json).unwrap();
    assert_eq!(payload.class_counts.get("P1"), Some(&500));
    assert_eq!(payload.class_counts.get("P2"), Some(&170));
}

#[test]
fn raw_entry_measurable_defaults_true() {
    let mut json = base_payload_json();
    json["raw_measurements"] = serde_json::json!([{
        "item": {
            "class_name": "P1",
            "measure_item_key": "VERTICAL_CD",
            "metric_type": {"name": "CD", "unit": "nm"}
        },
        "x_index": 3, "y_index": 5,
        "x_0": 12.5, "y_0": 8.0, "x_1": 13.0, "y_1": 8.6,
        "value": 31.27
    }]);
    let payload: IngestPayload = serde_json::from_value(json).unwrap();
    assert!(payload.raw_measurements[0].measurable);
    payload.validate().unwrap();
}

#[test]
fn empty_file_name_rejected() {
    let mut json = base_payload_json();
    json["file"]["file_name"] = serde_json::json!("");
    let payload: IngestPayload = serde_json::from_value(json).unwrap();
    let err = payload.validate().unwrap_err();
    match err {
        CaliperError::Ingest(IngestError::Validation { field, .. }) => {
            assert_eq!(field, "file.file_name");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn negative_class_count_rejected() {
    let mut json = base_payload_json();
    json["class_counts"] = serde_json::json!({"P1": -1});
    let payload: IngestPayload = serde_json::from_value(json).unwrap();
    assert!(payload.validate().is_err());
}

#[test]
fn blank_metric_type_name_rejected() {
    let mut json = base_payload_json();
    json["stat_measurements"] = serde_json::json!([{
        "item": {
            "class_name": "P1",
            "measure_item_key": "VERTICAL_CD",
            "metric_type": {"name": ""}
        },
        "values": [{"value_type_name": "AVG", "value": 1.0}]
    }]);
    let payload: IngestPayload = serde_json::from_value(json).unwrap();
    assert!(payload.validate().is_err());
}

#[test]
fn file_status_round_trips_through_serde() {
    let ok: FileStatus = serde_json::from_str("\"OK\"").unwrap();
    let fail: FileStatus = serde_json::from_str("\"FAIL\"").unwrap();
    assert_eq!(ok, FileStatus::Ok);
    assert_eq!(fail, FileStatus::Fail);
    assert_eq!(serde_json::to_string(&ok).unwrap(), "\"OK\"");
    assert!(serde_json::from_str::<FileStatus>("\"BROKEN\"").is_err());
}
