//! Property tests for the fingerprint function.

mod fingerprint_properties;
