//! Persisted config store trait and reference implementations

use crate::error::{Error, Result};
use crate::item::ConfigItem;
use crate::sync::RwLockExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Persisted source of [`ConfigItem`]s
///
/// This is the seam to the application's actual settings storage (a database
/// table, a config service, a file). The resolver only ever reads.
pub trait ConfigStore {
    /// Load a single item by its unique name
    fn load_by_name(&self, name: &str) -> Result<Option<ConfigItem>>;

    /// Load every item flagged for autoload
    fn load_all_autoload(&self) -> Result<Vec<ConfigItem>>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for Arc<T> {
    fn load_by_name(&self, name: &str) -> Result<Option<ConfigItem>> {
        (**self).load_by_name(name)
    }

    fn load_all_autoload(&self) -> Result<Vec<ConfigItem>> {
        (**self).load_all_autoload()
    }
}

// =============================================================================
// JSON File Store
// =============================================================================

/// File-backed store holding a JSON array of items
///
/// Writes are atomic: content goes to a temp file which is then renamed over
/// the target, so a crash mid-write never corrupts the store.
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileStore {
    /// Create a store backed by the given file (pretty-printed JSON)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
        }
    }

    /// Create a store writing compact JSON
    pub fn compact(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
        }
    }

    /// Store under the system config directory for the given app
    /// (falls back to the current directory if none is available)
    pub fn for_app(app_name: &str) -> Self {
        let dir = dirs::config_dir()
            .map(|d| d.join(app_name))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join("configs.json"))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(&self) -> Result<Vec<ConfigItem>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| Error::FileRead {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::from)
    }

    fn write_items(&self, items: &[ConfigItem]) -> Result<()> {
        let content = if self.pretty {
            serde_json::to_string_pretty(items)?
        } else {
            serde_json::to_string(items)?
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        // Atomic write: temp file + rename
        let file_name = self.path.file_name().ok_or_else(|| {
            Error::Config(format!(
                "Invalid store path '{}': must have a filename",
                self.path.display()
            ))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = self.path.with_file_name(temp_filename);

        std::fs::write(&temp_path, &content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &self.path).map_err(|e| Error::FileWrite {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Insert or replace an item by name
    pub fn upsert(&self, item: ConfigItem) -> Result<()> {
        let mut items = self.read_items()?;
        match items.iter_mut().find(|i| i.name == item.name) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        self.write_items(&items)
    }

    /// Remove an item by name, returning whether it existed
    pub fn remove(&self, name: &str) -> Result<bool> {
        let mut items = self.read_items()?;
        let before = items.len();
        items.retain(|i| i.name != name);
        let removed = items.len() != before;
        if removed {
            self.write_items(&items)?;
        }
        Ok(removed)
    }
}

impl ConfigStore for JsonFileStore {
    fn load_by_name(&self, name: &str) -> Result<Option<ConfigItem>> {
        Ok(self.read_items()?.into_iter().find(|i| i.name == name))
    }

    fn load_all_autoload(&self) -> Result<Vec<ConfigItem>> {
        Ok(self
            .read_items()?
            .into_iter()
            .filter(|i| i.autoload)
            .collect())
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// In-memory store for programmatic configuration and tests
#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, ConfigItem>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item by name
    pub fn insert(&self, item: ConfigItem) {
        if let Ok(mut guard) = self.items.write_recovered() {
            guard.insert(item.name.clone(), item);
        }
    }

    /// Remove an item by name, returning whether it existed
    pub fn remove(&self, name: &str) -> bool {
        self.items
            .write_recovered()
            .map(|mut guard| guard.remove(name).is_some())
            .unwrap_or(false)
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items
            .read_recovered()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Whether the store holds no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<ConfigItem> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = ConfigItem>>(iter: I) -> Self {
        let store = Self::new();
        for item in iter {
            store.insert(item);
        }
        store
    }
}

impl ConfigStore for MemoryStore {
    fn load_by_name(&self, name: &str) -> Result<Option<ConfigItem>> {
        let guard = self.items.read_recovered()?;
        Ok(guard.get(name).cloned())
    }

    fn load_all_autoload(&self) -> Result<Vec<ConfigItem>> {
        let guard = self.items.read_recovered()?;
        Ok(guard.values().filter(|i| i.autoload).cloned().collect())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ValueType;
    use tempfile::tempdir;

    fn sample_items() -> Vec<ConfigItem> {
        vec![
            ConfigItem::new("batch.default_method", "random", ValueType::String).autoloaded(),
            ConfigItem::new("batch.retry_count", "3", ValueType::Integer).autoloaded(),
            ConfigItem::new("providers.smtp_password", "hunter2", ValueType::Password),
        ]
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("configs.json"));

        for item in sample_items() {
            store.upsert(item).unwrap();
        }

        let found = store.load_by_name("batch.retry_count").unwrap().unwrap();
        assert_eq!(found.value, "3");
        assert_eq!(found.value_type, ValueType::Integer);

        let autoload = store.load_all_autoload().unwrap();
        assert_eq!(autoload.len(), 2);
        assert!(autoload.iter().all(|i| i.autoload));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nope.json"));

        assert_eq!(store.load_by_name("anything").unwrap(), None);
        assert!(store.load_all_autoload().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deeper/configs.json"));

        store
            .upsert(ConfigItem::new("a.b", "c", ValueType::String))
            .unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_file_store_upsert_replaces() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::compact(dir.path().join("configs.json"));

        store
            .upsert(ConfigItem::new("a.b", "old", ValueType::String))
            .unwrap();
        store
            .upsert(ConfigItem::new("a.b", "new", ValueType::String))
            .unwrap();

        let found = store.load_by_name("a.b").unwrap().unwrap();
        assert_eq!(found.value, "new");
        // Replaced, not appended
        let all: Vec<ConfigItem> =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("configs.json"));

        store
            .upsert(ConfigItem::new("a.b", "c", ValueType::String))
            .unwrap();
        assert!(store.remove("a.b").unwrap());
        assert!(!store.remove("a.b").unwrap());
        assert_eq!(store.load_by_name("a.b").unwrap(), None);
    }

    #[test]
    fn test_memory_store_basics() {
        let store: MemoryStore = sample_items().into_iter().collect();
        assert_eq!(store.len(), 3);

        let found = store
            .load_by_name("providers.smtp_password")
            .unwrap()
            .unwrap();
        assert_eq!(found.value_type, ValueType::Password);

        assert_eq!(store.load_all_autoload().unwrap().len(), 2);

        assert!(store.remove("batch.retry_count"));
        assert_eq!(store.load_all_autoload().unwrap().len(), 1);
    }
}
