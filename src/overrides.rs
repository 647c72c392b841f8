//! Local override sources
//!
//! An override source is deployment-local configuration that wins over
//! persisted values without ever being written back to the store. The
//! resolver checks it before the snapshot and before direct lookups.

use std::collections::HashMap;
use std::sync::Arc;

/// Source of process-local configuration overrides
pub trait OverrideSource {
    /// Whether an override is defined for `name`
    fn exists(&self, name: &str) -> bool;

    /// Raw override value for `name`, if defined
    fn value(&self, name: &str) -> Option<String>;
}

impl<T: OverrideSource + ?Sized> OverrideSource for Arc<T> {
    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }

    fn value(&self, name: &str) -> Option<String> {
        (**self).value(name)
    }
}

// =============================================================================
// No Overrides
// =============================================================================

/// Override source that never overrides anything (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl OverrideSource for NoOverrides {
    fn exists(&self, _name: &str) -> bool {
        false
    }

    fn value(&self, _name: &str) -> Option<String> {
        None
    }
}

// =============================================================================
// Map Overrides
// =============================================================================

/// Overrides held in a plain map, typically parsed from a deployment config
/// file at startup
#[derive(Debug, Clone, Default)]
pub struct MapOverrides {
    values: HashMap<String, String>,
}

impl MapOverrides {
    /// Create an empty override map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an override value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Number of defined overrides
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no overrides are defined
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl OverrideSource for MapOverrides {
    fn exists(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn value(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

// =============================================================================
// Environment Overrides
// =============================================================================

/// Overrides read from environment variables
///
/// The variable name is `{PREFIX}_{KEY}` with the key uppercased and dots
/// replaced by underscores: prefix `MAILER` and key `batch.default_method`
/// read `MAILER_BATCH_DEFAULT_METHOD`.
#[derive(Debug, Clone)]
pub struct EnvOverrides {
    prefix: String,
}

impl EnvOverrides {
    /// Create an environment override source with the given prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Environment variable name for a setting key
    pub fn var_name(&self, name: &str) -> String {
        let env_key = name.replace('.', "_").to_uppercase();
        format!("{}_{}", self.prefix.to_uppercase(), env_key)
    }
}

impl OverrideSource for EnvOverrides {
    fn exists(&self, name: &str) -> bool {
        std::env::var(self.var_name(name)).is_ok()
    }

    fn value(&self, name: &str) -> Option<String> {
        std::env::var(self.var_name(name)).ok()
    }
}

// =============================================================================
// Tests
// =============================================================================
