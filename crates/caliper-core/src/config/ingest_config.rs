use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Ingestion pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Bound on the wait for the per-fingerprint ingestion lock (milliseconds).
    pub lock_timeout_ms: u64,
}

impl IngestConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: defaults::DEFAULT_LOCK_TIMEOUT_MS,
        }
    }
}
