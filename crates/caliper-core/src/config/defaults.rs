//! Default values shared by the config structs.

/// Read connections opened alongside the single writer.
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// How long an ingestion call waits for the fingerprint lock.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 30_000;
