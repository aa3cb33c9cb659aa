use chrono::Utc;
use proptest::prelude::*;

use caliper_core::measurement::{FileDescriptor, FileStatus};
use caliper_ingest::{file_fingerprint, ingest_lock_key};

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

// Segment alphabet excludes the '|' join separator, like real path segments.
const SEGMENT: &str = "[a-zA-Z0-9_.-]{1,24}";

proptest! {
    #[test]
    fn digest_is_deterministic_64_hex(
        dir0 in SEGMENT,
        dir1 in proptest::option::of(SEGMENT),
        name in SEGMENT,
    ) {
        let a = descriptor(&dir0, dir1.as_deref(), None, &name);
        let b = descriptor(&dir0, dir1.as_deref(), None, &name);
        let fp = file_fingerprint(&a);
        prop_assert_eq!(&fp, &file_fingerprint(&b));
        prop_assert_eq!(fp.len(), 64);
        prop_assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_leaf_names_diverge(
        dir0 in SEGMENT,
        name_a in SEGMENT,
        name_b in SEGMENT,
    ) {
        prop_assume!(name_a != name_b);
        let a = descriptor(&dir0, None, None, &name_a);
        let b = descriptor(&dir0, None, None, &name_b);
        prop_assert_ne!(file_fingerprint(&a), file_fingerprint(&b));
    }

    #[test]
    fn segment_boundaries_matter(
        left in SEGMENT,
        right in SEGMENT,
        name in SEGMENT,
    ) {
        // ("ab", None) vs ("a", "b"): joined material must not collide.
        let merged = descriptor(&format!("{left}{right}"), None, None, &name);
        let split = descriptor(&left, Some(&right), None, &name);
        prop_assert_ne!(file_fingerprint(&merged), file_fingerprint(&split));
    }

    #[test]
    fn lock_key_is_bounded_and_prefixed(
        dir0 in SEGMENT,
        name in SEGMENT,
    ) {
        let key = ingest_lock_key(&file_fingerprint(&descriptor(&dir0, None, None, &name)));
        prop_assert!(key.len() <= 64);
        prop_assert!(key.starts_with("file_ing:"));
    }
}
