//! # layercfg - Layered Config Resolution
//!
//! A generic, framework-agnostic Rust library for resolving named
//! configuration values through layered sources: process-local overrides
//! win over a TTL-cached snapshot of "autoload" entries, which wins over
//! direct lookups against the persisted store.
//!
//! ## Features
//!
//! - **Layered Resolution**: Override source → autoload snapshot → direct
//!   store lookup, in that order
//! - **Typed Values**: Entries declare one of seven value types; `integer`
//!   entries are parsed, everything else passes through raw
//! - **TTL-Cached Autoload**: The snapshot of autoload-flagged entries is
//!   parked in a pluggable cache store and rebuilt after expiry (60 s by
//!   default)
//! - **Pluggable Collaborators**: [`ConfigStore`], [`OverrideSource`] and
//!   [`CacheStore`] are traits; reference implementations ship for files,
//!   maps, environment variables and in-process caching
//!
//! ## Quick Start
//!
//! ```rust
//! use layercfg::{ConfigItem, ConfigResolver, MemoryStore, ValueType};
//!
//! let store = MemoryStore::new();
//! store.insert(
//!     ConfigItem::new("batch.default_method", "random", ValueType::String).autoloaded(),
//! );
//! store.insert(
//!     ConfigItem::new("batch.retry_count", "3", ValueType::Integer).autoloaded(),
//! );
//!
//! let resolver = ConfigResolver::new(store);
//! assert_eq!(resolver.get_str("batch.default_method")?, "random");
//! assert_eq!(resolver.get_int("batch.retry_count")?, 3);
//! # Ok::<(), layercfg::Error>(())
//! ```
//!
//! ## Overrides
//!
//! Deployment-local values that must always win, without being written back
//! to the store:
//!
//! ```rust
//! use layercfg::{ConfigItem, ConfigResolver, MapOverrides, MemoryStore, ValueType};
//!
//! let store = MemoryStore::new();
//! store.insert(ConfigItem::new("batch.retry_count", "3", ValueType::Integer).autoloaded());
//!
//! let resolver = ConfigResolver::builder(store)
//!     .overrides(MapOverrides::from_iter([("batch.retry_count", "5")]))
//!     .build();
//!
//! assert_eq!(resolver.get_int("batch.retry_count")?, 5);
//! # Ok::<(), layercfg::Error>(())
//! ```
//!
//! [`EnvOverrides`] does the same from environment variables
//! (`MAILER_BATCH_RETRY_COUNT` for prefix `MAILER` and key
//! `batch.retry_count`).
//!
//! ## Cache Invalidation
//!
//! [`ConfigResolver::init_autoload`] with `force = true` re-reads the store
//! and rewrites the cached snapshot even within the TTL window. Sharing one
//! cache (behind `Arc`) between resolvers amortizes the scan across them.

// Core modules
mod cache;
mod error;
mod item;
mod overrides;
mod resolver;
mod store;
mod sync;

// Re-exports from core
pub use cache::{CacheStore, MemoryCache, NoCache};
pub use error::{Error, Result};
pub use item::{coerce, ConfigItem, ConfigValue, ValueType};
pub use overrides::{EnvOverrides, MapOverrides, NoOverrides, OverrideSource};
pub use resolver::{
    resolve_item, ConfigResolver, ConfigResolverBuilder, DEFAULT_CACHE_KEY, DEFAULT_TTL,
};
pub use store::{ConfigStore, JsonFileStore, MemoryStore};
