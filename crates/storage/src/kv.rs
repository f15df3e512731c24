//! Client-local string slots
//!
//! The preference layer reads and writes through [`PreferenceStorage`], a
//! seam in the shape of a browser's local storage: string keys, string
//! values, and every call allowed to fail. [`KvStore`] keeps the slots in
//! a sled tree as raw UTF-8, so a slot written by any other client reads
//! back unchanged.

use parking_lot::Mutex;
use sled::Tree;
use std::collections::HashMap;
use std::string::FromUtf8Error;
use std::sync::Arc;
use thiserror::Error;

/// Slot storage errors
#[derive(Debug, Error)]
pub enum KvError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// A stored value is not valid UTF-8
    #[error("Stored value is not UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),

    /// Invalid key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Storage is not available in this environment
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for slot operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Slot store configuration
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database directory
    pub path: String,
    /// Tree holding the slots
    pub tree: String,
    /// Cache capacity in bytes
    pub cache_capacity: u64,
    /// Flush to disk after every write
    pub flush_on_write: bool,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: "folio_kv.db".to_string(),
            tree: "local_storage".to_string(),
            cache_capacity: 1024 * 1024,
            flush_on_write: true,
        }
    }
}

impl KvConfig {
    /// Configuration for a database directory
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Store slots in a differently named tree
    pub fn tree(mut self, name: impl Into<String>) -> Self {
        self.tree = name.into();
        self
    }

    /// Set cache capacity in bytes
    pub fn cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Whether every write is flushed before returning
    ///
    /// With flushing off, a write made right before the process exits may
    /// be lost.
    pub fn flush_on_write(mut self, enabled: bool) -> Self {
        self.flush_on_write = enabled;
        self
    }
}

/// sled-backed string slots
#[derive(Debug, Clone)]
pub struct KvStore {
    slots: Tree,
    flush_on_write: bool,
}

impl KvStore {
    /// Open the store described by `config`
    pub fn new(config: KvConfig) -> Result<Self> {
        let db = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity)
            .open()?;
        let slots = db.open_tree(config.tree.as_bytes())?;
        tracing::debug!(path = %config.path, slots = slots.len(), "Slot store opened");
        Ok(Self { slots, flush_on_write: config.flush_on_write })
    }

    /// Store that lives only as long as the process
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        let slots = db.open_tree(KvConfig::default().tree.as_bytes())?;
        Ok(Self { slots, flush_on_write: false })
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.slots.flush()?;
        Ok(())
    }
}

/// String slot storage in the shape of a browser's local storage.
///
/// Every operation may fail; callers above the preference layer never
/// see these errors.
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStorage: Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`
    fn remove_item(&self, key: &str) -> Result<()>;
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(KvError::InvalidKey("empty key".to_string()));
    }
    Ok(())
}

impl PreferenceStorage for KvStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match self.slots.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(String::from_utf8(bytes.to_vec())?)),
            None => Ok(None),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        self.slots.insert(key.as_bytes(), value.as_bytes())?;
        if self.flush_on_write {
            self.flush()?;
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.slots.remove(key.as_bytes())?;
        if self.flush_on_write {
            self.flush()?;
        }
        Ok(())
    }
}

/// Process-local storage backed by a map
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one item
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.items.lock().insert(key.to_string(), value.to_string());
        storage
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.lock().remove(key);
        Ok(())
    }
}

/// Storage that rejects every operation (private browsing, quota exhausted)
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl PreferenceStorage for UnavailableStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>> {
        Err(KvError::Unavailable("storage disabled".to_string()))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        Err(KvError::Unavailable("storage disabled".to_string()))
    }

    fn remove_item(&self, _key: &str) -> Result<()> {
        Err(KvError::Unavailable("storage disabled".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{AppearanceMode, ThemePreference, THEME_PREFERENCE_KEY};

    #[test]
    fn test_slots_round_trip() {
        let kv = KvStore::in_memory().unwrap();

        assert_eq!(kv.get_item("theme").unwrap(), None);
        kv.set_item("theme", "dark").unwrap();
        assert_eq!(kv.get_item("theme").unwrap(), Some("dark".to_string()));

        kv.remove_item("theme").unwrap();
        assert_eq!(kv.get_item("theme").unwrap(), None);
        // Removing an absent slot is fine
        kv.remove_item("theme").unwrap();
    }

    #[test]
    fn test_values_stored_as_raw_utf8() {
        let kv = KvStore::in_memory().unwrap();
        kv.set_item("theme", "dark").unwrap();

        let raw = kv.slots.get(b"theme").unwrap().unwrap();
        assert_eq!(raw.as_ref(), b"dark");
    }

    #[test]
    fn test_slot_written_by_another_client() {
        let kv = KvStore::in_memory().unwrap();
        kv.slots.insert(THEME_PREFERENCE_KEY.as_bytes(), &b"dark"[..]).unwrap();

        let preference = ThemePreference::new(Arc::new(kv));
        assert_eq!(preference.load(), Some(AppearanceMode::Dark));
    }

    #[test]
    fn test_non_utf8_value_is_an_error() {
        let kv = KvStore::in_memory().unwrap();
        kv.slots.insert(b"theme", &[0xff, 0xfe][..]).unwrap();

        assert!(matches!(kv.get_item("theme"), Err(KvError::Encoding(_))));
        let preference = ThemePreference::new(Arc::new(kv));
        assert_eq!(preference.load(), None);
    }

    #[test]
    fn test_empty_key_rejected() {
        let kv = KvStore::in_memory().unwrap();
        assert!(matches!(kv.set_item("", "dark"), Err(KvError::InvalidKey(_))));
        assert!(matches!(MemoryStorage::new().set_item("", "dark"), Err(KvError::InvalidKey(_))));
    }

    #[test]
    fn test_clones_share_slots() {
        let kv = KvStore::in_memory().unwrap();
        let other = kv.clone();
        kv.set_item("theme", "light").unwrap();
        assert_eq!(other.get_item("theme").unwrap(), Some("light".to_string()));
    }

    #[test]
    fn test_kv_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db").to_string_lossy().to_string();

        {
            let kv = KvStore::new(KvConfig::new(path.clone())).unwrap();
            kv.set_item("theme", "dark").unwrap();
        }

        let kv = KvStore::new(KvConfig::new(path.clone())).unwrap();
        assert_eq!(kv.get_item("theme").unwrap(), Some("dark".to_string()));
        drop(kv);

        // Other trees do not see the slot
        let other = KvStore::new(KvConfig::new(path).tree("elsewhere")).unwrap();
        assert_eq!(other.get_item("theme").unwrap(), None);
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());

        storage.set_item("theme", "light").unwrap();
        assert_eq!(storage.get_item("theme").unwrap(), Some("light".to_string()));
        assert_eq!(storage.len(), 1);

        // Clones share the same slots
        let other = storage.clone();
        other.set_item("theme", "dark").unwrap();
        assert_eq!(storage.get_item("theme").unwrap(), Some("dark".to_string()));

        storage.remove_item("theme").unwrap();
        assert!(other.is_empty());
    }

    #[test]
    fn test_unavailable_storage() {
        let storage = UnavailableStorage;
        assert!(storage.get_item("theme").is_err());
        assert!(storage.set_item("theme", "dark").is_err());
        assert!(storage.remove_item("theme").is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = KvConfig::new("test.db").tree("prefs").cache_capacity(64 * 1024).flush_on_write(false);

        assert_eq!(config.path, "test.db");
        assert_eq!(config.tree, "prefs");
        assert_eq!(config.cache_capacity, 64 * 1024);
        assert!(!config.flush_on_write);
    }
}
