//! Keyed ingestion locks with bounded acquisition.
//!
//! Serializes whole ingestion calls per fingerprint, independently of the
//! storage transaction. Single-instance deployment: the registry is
//! in-process; the contract (serialization by key, bounded wait, idempotent
//! release) matches a cooperative external lock service.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use caliper_core::errors::IngestError;

/// Registry of currently held ingestion lock keys.
#[derive(Default)]
pub struct IngestLockRegistry {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

impl IngestLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, waiting at most `timeout`.
    /// Distinct keys never contend. The returned guard releases on drop.
    pub fn acquire(
        &self,
        key: &str,
        timeout: Duration,
    ) -> Result<IngestLockGuard<'_>, IngestError> {
        let started = Instant::now();
        let deadline = started + timeout;
        let mut held = self.held.lock();
        while held.contains(key) {
            tracing::debug!(key, "waiting for ingestion lock");
            if self.released.wait_until(&mut held, deadline).timed_out() {
                return Err(IngestError::LockTimeout {
                    key: key.to_string(),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }
        }
        held.insert(key.to_string());
        Ok(IngestLockGuard {
            registry: self,
            key: key.to_string(),
        })
    }

    /// Release the lock for `key`. Idempotent: releasing a key that is not
    /// held is a no-op.
    pub fn release(&self, key: &str) {
        let mut held = self.held.lock();
        if held.remove(key) {
            self.released.notify_all();
        }
    }

    /// Whether `key` is currently held (for tests and diagnostics).
    pub fn is_held(&self, key: &str) -> bool {
        self.held.lock().contains(key)
    }
}

/// Holds one ingestion lock key and releases it when dropped, so every exit
/// path of the pipeline releases, including panic unwind.
pub struct IngestLockGuard<'a> {
    registry: &'a IngestLockRegistry,
    key: String,
}

impl IngestLockGuard<'_> {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for IngestLockGuard<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn acquire_and_drop_releases() {
        let registry = IngestLockRegistry::new();
        {
            let guard = registry.acquire("k1", Duration::from_millis(10)).unwrap();
            assert_eq!(guard.key(), "k1");
            assert!(registry.is_held("k1"));
        }
        assert!(!registry.is_held("k1"));
    }

    #[test]
    fn contended_key_times_out() {
        let registry = IngestLockRegistry::new();
        let _guard = registry.acquire("k1", Duration::from_millis(10)).unwrap();
        let err = registry
            .acquire("k1", Duration::from_millis(25))
            .err()
            .expect("second acquire should time out");
        match err {
            IngestError::LockTimeout { key, .. } => assert_eq!(key, "k1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn distinct_keys_do_not_contend() {
        let registry = IngestLockRegistry::new();
        let _a = registry.acquire("k1", Duration::from_millis(10)).unwrap();
        let _b = registry.acquire("k2", Duration::from_millis(10)).unwrap();
        assert!(registry.is_held("k1"));
        assert!(registry.is_held("k2"));
    }

    #[test]
    fn release_is_idempotent() {
        let registry = IngestLockRegistry::new();
        registry.release("never-held");
        let guard = registry.acquire("k1", Duration::from_millis(10)).unwrap();
        drop(guard);
        registry.release("k1");
    }

    #[test]
    fn waiter_proceeds_after_release() {
        let registry = Arc::new(IngestLockRegistry::new());
        let guard = registry.acquire("k1", Duration::from_millis(10)).unwrap();

        let waiter = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                registry
                    .acquire("k1", Duration::from_secs(5))
                    .map(|g| g.key().to_string())
            })
        };

        std::thread::sleep(Duration::from_millis(20));
        drop(guard);
        let acquired = waiter.join().expect("waiter should not panic").unwrap();
        assert_eq!(acquired, "k1");
    }
}
