//! Shared fixtures for integration tests

use layercfg::{ConfigItem, ConfigStore, MemoryStore, Result, ValueType};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Store wrapper counting how often each load path is hit
///
/// `load_all_autoload` counts full-scan reads (the expensive path the
/// snapshot cache amortizes); `load_by_name` counts direct lookups.
pub struct CountingStore {
    inner: MemoryStore,
    autoload_scans: AtomicUsize,
    direct_lookups: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Arc<Self> {
        Arc::new(Self {
            inner,
            autoload_scans: AtomicUsize::new(0),
            direct_lookups: AtomicUsize::new(0),
        })
    }

    pub fn autoload_scans(&self) -> usize {
        self.autoload_scans.load(Ordering::SeqCst)
    }

    pub fn direct_lookups(&self) -> usize {
        self.direct_lookups.load(Ordering::SeqCst)
    }

    pub fn insert(&self, item: ConfigItem) {
        self.inner.insert(item);
    }
}

impl ConfigStore for CountingStore {
    fn load_by_name(&self, name: &str) -> Result<Option<ConfigItem>> {
        self.direct_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.load_by_name(name)
    }

    fn load_all_autoload(&self) -> Result<Vec<ConfigItem>> {
        self.autoload_scans.fetch_add(1, Ordering::SeqCst);
        self.inner.load_all_autoload()
    }
}

/// Store with the usual mailer-flavored entries: three autoload items plus
/// one outside the autoload set
pub fn seeded_store() -> Arc<CountingStore> {
    let _ = env_logger::builder().is_test(true).try_init();

    let inner = MemoryStore::new();
    inner.insert(
        ConfigItem::new("batch.default_method", "random", ValueType::String).autoloaded(),
    );
    inner.insert(ConfigItem::new("batch.retry_count", "3", ValueType::Integer).autoloaded());
    inner.insert(
        ConfigItem::new("mailer.notifications_enabled", "1", ValueType::Boolean).autoloaded(),
    );
    inner.insert(ConfigItem::new(
        "providers.smtp_password",
        "hunter2",
        ValueType::Password,
    ));
    CountingStore::new(inner)
}
