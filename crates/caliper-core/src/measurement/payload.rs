use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::file::{FileDescriptor, MeasurementFileRecord};
use crate::errors::{CaliperResult, IngestError};

/// Reference to a metric type by name, with the unit seen at first reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricTypeRef {
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Reference to a measured item: (class, item key) under a metric type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRef {
    pub class_name: String,
    pub measure_item_key: String,
    pub metric_type: MetricTypeRef,
}

/// One point-level observation in the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMeasurementEntry {
    pub item: ItemRef,
    #[serde(default = "default_true")]
    pub measurable: bool,
    pub x_index: i32,
    pub y_index: i32,
    pub x_0: f64,
    pub y_0: f64,
    pub x_1: f64,
    pub y_1: f64,
    pub value: f64,
}

/// One (value type, value) pair belonging to a stat measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatValueEntry {
    pub value_type_name: String,
    pub value: f64,
}

/// One aggregate summary entry in the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatMeasurementEntry {
    pub item: ItemRef,
    #[serde(default)]
    pub values: Vec<StatValueEntry>,
    #[serde(default)]
    pub extra_json: Option<serde_json::Value>,
}

/// List form of a class-count pair, accepted as an alternative to the map form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassCountEntry {
    pub class_name: String,
    pub count: i64,
}

/// The full ingestion request for a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestPayload {
    pub file: FileDescriptor,
    #[serde(default)]
    pub raw_measurements: Vec<RawMeasurementEntry>,
    #[serde(default)]
    pub stat_measurements: Vec<StatMeasurementEntry>,
    #[serde(default, deserialize_with = "deserialize_class_counts")]
    pub class_counts: BTreeMap<String, i64>,
}

/// Result summary returned to the caller after a committed ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSummary {
    pub file: MeasurementFileRecord,
    pub raw_records: usize,
    pub stat_measurements: usize,
}

fn default_true() -> bool {
    true
}

/// Accept class counts either as a name-to-count map or a list of entries.
fn deserialize_class_counts<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Input {
        Map(BTreeMap<String, i64>),
        List(Vec<ClassCountEntry>),
    }

    Ok(match Option::<Input>::deserialize(deserializer)? {
        None => BTreeMap::new(),
        Some(Input::Map(map)) => map,
        Some(Input::List(entries)) => entries
            .into_iter()
            .map(|entry| (entry.class_name, entry.count))
            .collect(),
    })
}

impl IngestPayload {
    /// Reject malformed payloads before any lock is taken or row written.
    pub fn validate(&self) -> CaliperResult<()> {
        require(!self.file.file_path.is_empty(), "file.file_path", "must not be empty")?;
        require(!self.file.file_name.is_empty(), "file.file_name", "must not be empty")?;
        require(
            !self.file.parent_dir_0.is_empty(),
            "file.parent_dir_0",
            "must not be empty",
        )?;

        for (idx, entry) in self.raw_measurements.iter().enumerate() {
            validate_item(&entry.item, &format!("raw_measurements[{idx}].item"))?;
        }
        for (idx, entry) in self.stat_measurements.iter().enumerate() {
            let field = format!("stat_measurements[{idx}]");
            validate_item(&entry.item, &format!("{field}.item"))?;
            for (vidx, value) in entry.values.iter().enumerate() {
                require(
                    !value.value_type_name.is_empty(),
                    &format!("{field}.values[{vidx}].value_type_name"),
                    "must not be empty",
                )?;
            }
        }
        for (name, count) in &self.class_counts {
            require(!name.is_empty(), "class_counts", "class name must not be empty")?;
            require(*count >= 0, "class_counts", "count must be non-negative")?;
        }
        Ok(())
    }
}

fn validate_item(item: &ItemRef, field: &str) -> CaliperResult<()> {
    require(
        !item.class_name.is_empty(),
        &format!("{field}.class_name"),
        "must not be empty",
    )?;
    require(
        !item.measure_item_key.is_empty(),
        &format!("{field}.measure_item_key"),
        "must not be empty",
    )?;
    require(
        !item.metric_type.name.is_empty(),
        &format!("{field}.metric_type.name"),
        "must not be empty",
    )
}

fn require(condition: bool, field: &str, reason: &str) -> CaliperResult<()> {
    if condition {
        Ok(())
    } else {
        Err(IngestError::Validation {
            field: field.to_string(),
            reason: reason.to_string(),
        }
        .into())
    }
}
