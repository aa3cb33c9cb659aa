//! # caliper-core
//!
//! Foundation crate for the Caliper measurement ingestion system.
//! Defines all types, errors, config, constants, and the storage trait.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod measurement;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CaliperConfig;
pub use errors::{CaliperError, CaliperResult};
pub use measurement::{
    FileDescriptor, FileStatus, IngestPayload, IngestSummary, MeasurementFileRecord,
};
