//! TTL-bounded blob cache for autoload snapshots
//!
//! The resolver serializes its snapshot to a JSON blob and parks it here
//! under a single key. Expiry is the cache store's concern: an expired entry
//! reads as absent, which is what triggers the next full store scan.

use crate::error::Result;
use crate::sync::RwLockExt;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Time-bounded key/blob store
///
/// Implementations backed by external services may surface failures as
/// [`Error::Cache`](crate::Error::Cache); the resolver propagates them
/// unchanged.
pub trait CacheStore {
    /// Read a non-expired blob, or `None`
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write a blob that expires after `ttl`
    fn write(&self, key: &str, blob: &str, ttl: Duration) -> Result<()>;
}

impl<T: CacheStore + ?Sized> CacheStore for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, blob: &str, ttl: Duration) -> Result<()> {
        (**self).write(key, blob, ttl)
    }
}

// =============================================================================
// In-Process Cache
// =============================================================================

struct Entry {
    blob: String,
    expires_at: Instant,
}

/// In-process cache with per-entry expiry (the default)
///
/// Share one instance (behind `Arc`) between resolvers to amortize the
/// autoload scan across them the way an external cache service would.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn read(&self, key: &str) -> Result<Option<String>> {
        {
            let guard = self.entries.read_recovered()?;
            match guard.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.blob.clone()));
                }
                Some(_) => {} // expired, fall through to cleanup
                None => return Ok(None),
            }
        }

        // Drop the expired entry lazily
        let mut guard = self.entries.write_recovered()?;
        if guard
            .get(key)
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            guard.remove(key);
        }
        Ok(None)
    }

    fn write(&self, key: &str, blob: &str, ttl: Duration) -> Result<()> {
        let mut guard = self.entries.write_recovered()?;
        guard.insert(
            key.to_string(),
            Entry {
                blob: blob.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}

// =============================================================================
// No Cache
// =============================================================================

/// Cache store that retains nothing; every snapshot population goes back to
/// the persisted store
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl CacheStore for NoCache {
    fn read(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _blob: &str, _ttl: Duration) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let cache = MemoryCache::new();
        cache
            .write("snapshot", "{}", Duration::from_secs(60))
            .unwrap();

        assert_eq!(cache.read("snapshot").unwrap(), Some("{}".into()));
        assert_eq!(cache.read("other").unwrap(), None);
    }

    #[test]
    fn test_expired_entry_reads_as_absent() {
        let cache = MemoryCache::new();
        cache
            .write("snapshot", "{}", Duration::from_millis(10))
            .unwrap();

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.read("snapshot").unwrap(), None);
        // A second read after cleanup is still absent
        assert_eq!(cache.read("snapshot").unwrap(), None);
    }

    #[test]
    fn test_rewrite_refreshes_expiry() {
        let cache = MemoryCache::new();
        cache
            .write("snapshot", "old", Duration::from_millis(10))
            .unwrap();
        cache
            .write("snapshot", "new", Duration::from_secs(60))
            .unwrap();

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.read("snapshot").unwrap(), Some("new".into()));
    }

    #[test]
    fn test_no_cache_never_retains() {
        let cache = NoCache;
        cache
            .write("snapshot", "{}", Duration::from_secs(60))
            .unwrap();
        assert_eq!(cache.read("snapshot").unwrap(), None);
    }
}
