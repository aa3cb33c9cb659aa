use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing outcome reported by the detection pipeline for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FileStatus {
    #[default]
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAIL")]
    Fail,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Ok => "OK",
            FileStatus::Fail => "FAIL",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "OK" => Some(FileStatus::Ok),
            "FAIL" => Some(FileStatus::Fail),
            _ => None,
        }
    }
}

/// Incoming description of one measurement artifact.
///
/// The three parent directory segments are hierarchical: `parent_dir_0` is the
/// leaf-most required segment, the other two are optional ancestors. Together
/// with `file_name` they identify the file for fingerprinting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub post_time: DateTime<Utc>,
    pub file_path: String,
    pub parent_dir_0: String,
    #[serde(default)]
    pub parent_dir_1: Option<String>,
    #[serde(default)]
    pub parent_dir_2: Option<String>,
    pub file_name: String,
    /// Flat location dimensions, resolved lazily during ingestion.
    #[serde(default)]
    pub node_name: Option<String>,
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(default)]
    pub version_name: Option<String>,
    /// Caller-supplied hash. Honored by the plain create passthrough only;
    /// the ingestion pipeline always computes its own fingerprint.
    #[serde(default)]
    pub file_hash: Option<String>,
    #[serde(default)]
    pub processing_ms: Option<i64>,
    #[serde(default)]
    pub status: FileStatus,
}

impl FileDescriptor {
    /// Location segments in fingerprint order, optional ones as None.
    pub fn location_fields(&self) -> [Option<&str>; 4] {
        [
            Some(self.parent_dir_0.as_str()),
            self.parent_dir_1.as_deref(),
            self.parent_dir_2.as_deref(),
            Some(self.file_name.as_str()),
        ]
    }
}

/// A persisted file master record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementFileRecord {
    pub id: i64,
    pub post_time: DateTime<Utc>,
    pub file_path: String,
    pub file_name: String,
    pub file_hash: Option<String>,
    pub processing_ms: Option<i64>,
    pub status: FileStatus,
    pub node_id: Option<i64>,
    pub module_id: Option<i64>,
    pub version_id: Option<i64>,
    pub directory_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
