//! Layered value resolution with a TTL-cached autoload snapshot
//!
//! [`ConfigResolver`] answers `get(name)` by checking, in order:
//!
//! 1. the in-process autoload snapshot (populated from the cache store, or
//!    from a full store scan when the cached blob is absent or expired);
//! 2. a direct single-item store lookup for entries outside the autoload set.
//!
//! On either path, a defined local override wins over the stored raw value,
//! and the result is coerced per the item's declared type.

use crate::cache::{CacheStore, MemoryCache};
use crate::error::{Error, Result};
use crate::item::{coerce, ConfigItem, ConfigValue};
use crate::overrides::{NoOverrides, OverrideSource};
use crate::store::ConfigStore;
use crate::sync::RwLockExt;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// Default time-to-live for the cached autoload snapshot
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Default cache key the snapshot blob is stored under
pub const DEFAULT_CACHE_KEY: &str = "config_autoload_cache";

type Snapshot = HashMap<String, ConfigItem>;

/// Apply override precedence and type coercion to one item
///
/// Kept free of any store or cache I/O so the precedence and coercion rules
/// unit-test on their own.
///
/// # Errors
///
/// Returns [`Error::InvalidInteger`] when the effective raw value fails
/// integer coercion.
pub fn resolve_item(item: &ConfigItem, overrides: &impl OverrideSource) -> Result<ConfigValue> {
    let raw = if overrides.exists(&item.name) {
        overrides
            .value(&item.name)
            .unwrap_or_else(|| item.value.clone())
    } else {
        item.value.clone()
    };
    coerce(&item.name, &raw, item.value_type)
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves named configuration values through override, snapshot and store
/// layers
///
/// # Example
///
/// ```
/// use layercfg::{ConfigItem, ConfigResolver, MemoryStore, ValueType};
///
/// let store = MemoryStore::new();
/// store.insert(
///     ConfigItem::new("batch.default_method", "random", ValueType::String).autoloaded(),
/// );
///
/// let resolver = ConfigResolver::new(store);
/// assert_eq!(
///     resolver.get("batch.default_method")?.as_str(),
///     Some("random"),
/// );
/// # Ok::<(), layercfg::Error>(())
/// ```
pub struct ConfigResolver<S, O = NoOverrides, C = MemoryCache>
where
    S: ConfigStore,
    O: OverrideSource,
    C: CacheStore,
{
    store: S,
    overrides: O,
    cache: C,
    cache_key: String,
    ttl: Duration,
    /// Autoload snapshot; `None` means not loaded yet (an empty map is a
    /// valid loaded state)
    snapshot: RwLock<Option<Snapshot>>,
}

impl<S: ConfigStore> ConfigResolver<S> {
    /// Create a resolver with no overrides, an in-process cache and the
    /// default TTL
    pub fn new(store: S) -> Self {
        Self::builder(store).build()
    }

    /// Create a builder for a resolver with custom collaborators
    ///
    /// # Example
    ///
    /// ```
    /// use layercfg::{ConfigResolver, MapOverrides, MemoryStore};
    /// use std::time::Duration;
    ///
    /// let resolver = ConfigResolver::builder(MemoryStore::new())
    ///     .overrides(MapOverrides::from_iter([("batch.retry_count", "5")]))
    ///     .ttl(Duration::from_secs(30))
    ///     .build();
    /// # let _ = resolver;
    /// ```
    pub fn builder(store: S) -> ConfigResolverBuilder<S, NoOverrides, MemoryCache> {
        ConfigResolverBuilder {
            store,
            overrides: NoOverrides,
            cache: MemoryCache::new(),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            ttl: DEFAULT_TTL,
        }
    }
}

impl<S: ConfigStore, O: OverrideSource, C: CacheStore> ConfigResolver<S, O, C> {
    /// Resolve the effective, typed value for `name`
    ///
    /// Entries outside the autoload set fall back to a direct store lookup;
    /// that path is never cached, so such keys cost one store read per call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] when the key is absent from both
    /// the snapshot and the store; store and cache failures propagate
    /// unchanged, without retry.
    pub fn get(&self, name: &str) -> Result<ConfigValue> {
        if !self.loaded() {
            self.init_autoload(false)?;
        }

        if let Some(item) = self.snapshot_item(name)? {
            return resolve_item(&item, &self.overrides);
        }

        if let Some(item) = self.store.load_by_name(name)? {
            debug!("Resolved '{name}' via direct store lookup");
            return resolve_item(&item, &self.overrides);
        }

        Err(Error::ConfigNotFound(name.to_string()))
    }

    /// Resolve a value and render it as a string
    ///
    /// # Errors
    ///
    /// Same failure modes as [`get`](Self::get).
    pub fn get_str(&self, name: &str) -> Result<String> {
        Ok(self.get(name)?.into_string())
    }

    /// Resolve a value as an integer, parsing string-typed values as well
    ///
    /// # Errors
    ///
    /// Same failure modes as [`get`](Self::get), plus
    /// [`Error::InvalidInteger`] for a string value that does not parse.
    pub fn get_int(&self, name: &str) -> Result<i64> {
        match self.get(name)? {
            ConfigValue::Integer(n) => Ok(n),
            ConfigValue::String(raw) => {
                raw.parse().map_err(|source| Error::InvalidInteger {
                    name: name.to_string(),
                    raw,
                    source,
                })
            }
        }
    }

    /// Populate the autoload snapshot
    ///
    /// With `force == false`, a non-expired cached blob is adopted as-is and
    /// the store is not scanned; repeated calls within the TTL window are
    /// no-ops beyond the initial population. With `force == true` the store
    /// is always scanned and the cache blob rewritten.
    ///
    /// # Errors
    ///
    /// Store and cache failures propagate unchanged.
    pub fn init_autoload(&self, force: bool) -> Result<()> {
        if !force {
            if let Some(blob) = self.cache.read(&self.cache_key)? {
                let items: Snapshot = serde_json::from_str(&blob)?;
                debug!("Adopted cached autoload snapshot ({} items)", items.len());
                *self.snapshot.write_recovered()? = Some(items);
                return Ok(());
            }
        }

        let loaded = self.store.load_all_autoload()?;
        let mut items = Snapshot::with_capacity(loaded.len());
        for item in loaded {
            items.insert(item.name.clone(), item);
        }

        let blob = serde_json::to_string(&items)?;
        self.cache.write(&self.cache_key, &blob, self.ttl)?;
        info!("Autoload snapshot populated with {} items", items.len());

        *self.snapshot.write_recovered()? = Some(items);
        Ok(())
    }

    fn loaded(&self) -> bool {
        self.snapshot
            .read_recovered()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    fn snapshot_item(&self, name: &str) -> Result<Option<ConfigItem>> {
        let guard = self.snapshot.read_recovered()?;
        Ok(guard.as_ref().and_then(|items| items.get(name).cloned()))
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`ConfigResolver`] with a fluent API
pub struct ConfigResolverBuilder<S, O, C> {
    store: S,
    overrides: O,
    cache: C,
    cache_key: String,
    ttl: Duration,
}

impl<S: ConfigStore, O: OverrideSource, C: CacheStore> ConfigResolverBuilder<S, O, C> {
    /// Set the local override source
    pub fn overrides<O2: OverrideSource>(self, overrides: O2) -> ConfigResolverBuilder<S, O2, C> {
        ConfigResolverBuilder {
            store: self.store,
            overrides,
            cache: self.cache,
            cache_key: self.cache_key,
            ttl: self.ttl,
        }
    }

    /// Set the snapshot cache store
    pub fn cache<C2: CacheStore>(self, cache: C2) -> ConfigResolverBuilder<S, O, C2> {
        ConfigResolverBuilder {
            store: self.store,
            overrides: self.overrides,
            cache,
            cache_key: self.cache_key,
            ttl: self.ttl,
        }
    }

    /// Set the snapshot time-to-live (default: 60 seconds)
    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the cache key the snapshot blob is stored under
    #[must_use]
    pub fn cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = key.into();
        self
    }

    /// Build the resolver
    pub fn build(self) -> ConfigResolver<S, O, C> {
        ConfigResolver {
            store: self.store,
            overrides: self.overrides,
            cache: self.cache,
            cache_key: self.cache_key,
            ttl: self.ttl,
            snapshot: RwLock::new(None),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
