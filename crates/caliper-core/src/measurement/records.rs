use serde::{Deserialize, Serialize};

/// A persisted point-level observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMeasurementRecord {
    pub id: i64,
    pub file_id: i64,
    pub item_id: i64,
    pub measurable: bool,
    pub x_index: i32,
    pub y_index: i32,
    pub x_0: f64,
    pub y_0: f64,
    pub x_1: f64,
    pub y_1: f64,
    pub value: f64,
}

/// Fields for inserting a raw record with already-resolved references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRawRecord {
    pub file_id: i64,
    pub item_id: i64,
    pub measurable: bool,
    pub x_index: i32,
    pub y_index: i32,
    pub x_0: f64,
    pub y_0: f64,
    pub x_1: f64,
    pub y_1: f64,
    pub value: f64,
}

/// One (value type, value) pair of a persisted stat measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatValueRecord {
    pub value_type_id: i64,
    pub value: f64,
}

/// A persisted aggregate summary with its value rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatMeasurementRecord {
    pub id: i64,
    pub file_id: i64,
    pub item_id: i64,
    pub extra_json: Option<serde_json::Value>,
    pub values: Vec<StatValueRecord>,
}

/// Fields for inserting a stat measurement with already-resolved references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStatMeasurement {
    pub file_id: i64,
    pub item_id: i64,
    pub extra_json: Option<serde_json::Value>,
    pub values: Vec<StatValueRecord>,
}

/// Per-file count for one detection class, read back by class name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCountRecord {
    pub class_name: String,
    pub count: i64,
}
