//! # caliper-ingest
//!
//! The ingestion pipeline: fingerprint an incoming file descriptor, serialize
//! same-fingerprint calls behind a keyed lock, resolve dimension rows through
//! a per-call cache, reconcile the file master record, and write all detail
//! rows in one transaction.

pub mod details;
pub mod fingerprint;
pub mod lock;
pub mod pipeline;
pub mod reconcile;
pub mod resolver;

pub use fingerprint::{file_fingerprint, ingest_lock_key};
pub use lock::{IngestLockGuard, IngestLockRegistry};
pub use pipeline::IngestPipeline;
