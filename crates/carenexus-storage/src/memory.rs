use std::collections::BTreeMap;

use crate::{KeyValueStore, StorageError};

/// An in-process [`KeyValueStore`]. Contents are lost on drop.
///
/// `Clone` gives tests a cheap way to snapshot the store and "restart"
/// the portal on the copy.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("users").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let mut store = MemoryStore::new();
        store.set("nextAccountId", "101".into()).unwrap();
        store.set("nextAccountId", "102".into()).unwrap();

        assert_eq!(store.get("nextAccountId").unwrap().as_deref(), Some("102"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let mut store = MemoryStore::new();
        store.remove("authUser").expect("removing nothing is fine");
        assert!(store.is_empty());
    }

    #[test]
    fn test_keys_are_sorted() {
        let mut store = MemoryStore::new();
        store.set("users", "[]".into()).unwrap();
        store.set("authUser", "{}".into()).unwrap();
        store.set("doctors", "[]".into()).unwrap();

        assert_eq!(store.keys().unwrap(), vec!["authUser", "doctors", "users"]);
    }

    #[test]
    fn test_clone_is_independent_snapshot() {
        let mut store = MemoryStore::new();
        store.set("a", "1".into()).unwrap();
        let snapshot = store.clone();

        store.set("a", "2".into()).unwrap();

        assert_eq!(snapshot.get("a").unwrap().as_deref(), Some("1"));
    }
}
