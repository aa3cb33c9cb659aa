use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Storage subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path. None selects an in-memory database.
    pub db_path: Option<PathBuf>,
    /// Number of read connections in the pool.
    pub read_pool_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
        }
    }
}
