//! Serde-defaulted configuration, loadable from TOML.

mod defaults;
mod ingest_config;
mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use ingest_config::IngestConfig;
pub use storage_config::StorageConfig;

use crate::errors::{CaliperError, CaliperResult};

/// Top-level configuration for the Caliper system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaliperConfig {
    pub storage: StorageConfig,
    pub ingest: IngestConfig,
}

impl CaliperConfig {
    /// Load configuration from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> CaliperResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CaliperError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(raw: &str) -> CaliperResult<Self> {
        toml::from_str(raw).map_err(|e| CaliperError::Config(format!("parse: {e}")))
    }
}
