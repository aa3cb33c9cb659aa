//! Content fingerprint over a file descriptor's location fields.

use sha2::{Digest, Sha256};

use caliper_core::constants::{FINGERPRINT_SEPARATOR, LOCK_KEY_PREFIX, MAX_LOCK_KEY_LEN};
use caliper_core::measurement::FileDescriptor;

/// Digest the identifying location fields of a descriptor.
///
/// Absent optional segments normalize to the empty string, so
/// `["a", None, None]` and `["a", Some(""), None]` fingerprint identically
/// while `["a", Some("b"), None]` does not.
pub fn file_fingerprint(file: &FileDescriptor) -> String {
    let material = file
        .location_fields()
        .map(|segment| segment.unwrap_or(""))
        .join(FINGERPRINT_SEPARATOR);
    hex::encode(Sha256::digest(material.as_bytes()))
}

/// Lock key for a fingerprint: fixed prefix plus as many leading digest
/// characters as fit the overall length budget of the lock mechanism.
pub fn ingest_lock_key(fingerprint: &str) -> String {
    let budget = MAX_LOCK_KEY_LEN - LOCK_KEY_PREFIX.len();
    let end = budget.min(fingerprint.len());
    format!("{LOCK_KEY_PREFIX}{}", &fingerprint[..end])
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use caliper_core::constants::MAX_LOCK_KEY_LEN;
    use caliper_core::measurement::{FileDescriptor, FileStatus};

    use super::*;

    fn descriptor(dir0: &str, dir1: Option<&str>, dir2: Option<&str>, name: &str) -> FileDescriptor {
        FileDescriptor {
            post_time: Utc::now(),
            file_path: format!("/data/{dir0}/{name}"),
            parent_dir_0: dir0.to_string(),
            parent_dir_1: dir1.map(str::to_string),
            parent_dir_2: dir2.map(str::to_string),
            file_name: name.to_string(),
            node_name: None,
            module_name: None,
            version_name: None,
            file_hash: None,
            processing_ms: None,
            status: FileStatus::Ok,
        }
    }

    #[test]
    fn identical_fields_identical_digest() {
        let a = descriptor("img", Some("wafer123"), None, "run1.csv");
        let b = descriptor("img", Some("wafer123"), None, "run1.csv");
        assert_eq!(file_fingerprint(&a), file_fingerprint(&b));
    }

    #[test]
    fn digest_ignores_non_location_fields() {
        let mut a = descriptor("img", None, None, "run1.csv");
        let b = descriptor("img", None, None, "run1.csv");
        a.processing_ms = Some(999);
        a.file_path = "/elsewhere/run1.csv".to_string();
        assert_eq!(file_fingerprint(&a), file_fingerprint(&b));
    }

    #[test]
    fn optional_segment_presence_changes_digest() {
        let without = descriptor("img", None, None, "run1.csv");
        let with = descriptor("img", Some("wafer123"), None, "run1.csv");
        assert_ne!(file_fingerprint(&without), file_fingerprint(&with));
    }

    #[test]
    fn digest_is_64_hex_chars() {
        let fp = file_fingerprint(&descriptor("img", None, None, "run1.csv"));
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn lock_key_fits_budget_and_keeps_prefix() {
        let fp = file_fingerprint(&descriptor("img", None, None, "run1.csv"));
        let key = ingest_lock_key(&fp);
        assert!(key.len() <= MAX_LOCK_KEY_LEN);
        assert!(key.starts_with("file_ing:"));
        assert!(fp.starts_with(&key["file_ing:".len()..]));
    }
}
