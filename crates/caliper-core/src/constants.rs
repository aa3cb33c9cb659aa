/// Caliper system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix for ingestion lock keys.
pub const LOCK_KEY_PREFIX: &str = "file_ing:";

/// Maximum length of an ingestion lock key, prefix included.
pub const MAX_LOCK_KEY_LEN: usize = 64;

/// Separator joining descriptor fields into fingerprint material.
/// Must not occur in path segments or file names.
pub const FINGERPRINT_SEPARATOR: &str = "|";

/// Length of a hex-encoded SHA-256 fingerprint.
pub const FINGERPRINT_LEN: usize = 64;
