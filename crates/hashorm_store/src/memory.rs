//! In-memory hash store for testing.

use crate::error::{StorageError, StorageResult};
use crate::store::HashStore;
use parking_lot::RwLock;
use std::collections::HashMap;

/// One stored value: a plain string, a field-value hash, or a list.
#[derive(Debug, Clone)]
enum Entry {
    Value(String),
    Hash(HashMap<String, String>),
    List(Vec<String>),
}

/// An in-memory hash store.
///
/// This store keeps all data in a process-local map and is suitable
/// for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral repositories that don't need persistence
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use hashorm_store::{HashStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.hset("app:User:0", "name", "alice").unwrap();
/// assert_eq!(store.hget("app:User:0", "name").unwrap().as_deref(), Some("alice"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every key currently holding a value.
    ///
    /// Useful for testing and debugging. Order is unspecified.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Returns the number of keys holding a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Removes every key from the store.
    pub fn clear(&mut self) {
        self.entries.write().clear();
    }
}

impl HashStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match self.entries.read().get(key) {
            None => Ok(None),
            Some(Entry::Value(v)) => Ok(Some(v.clone())),
            Some(_) => Err(StorageError::wrong_type(key)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .write()
            .insert(key.to_owned(), Entry::Value(value.to_owned()));
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.entries.read().contains_key(key))
    }

    fn del(&mut self, key: &str) -> StorageResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn hget(&self, key: &str, field: &str) -> StorageResult<Option<String>> {
        match self.entries.read().get(key) {
            None => Ok(None),
            Some(Entry::Hash(fields)) => Ok(fields.get(field).cloned()),
            Some(_) => Err(StorageError::wrong_type(key)),
        }
    }

    fn hset(&mut self, key: &str, field: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write();
        match entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::Hash(HashMap::new()))
        {
            Entry::Hash(fields) => {
                fields.insert(field.to_owned(), value.to_owned());
                Ok(())
            }
            _ => Err(StorageError::wrong_type(key)),
        }
    }

    fn hdel(&mut self, key: &str, field: &str) -> StorageResult<()> {
        let mut entries = self.entries.write();
        let now_empty = match entries.get_mut(key) {
            None => return Ok(()),
            Some(Entry::Hash(fields)) => {
                fields.remove(field);
                fields.is_empty()
            }
            Some(_) => return Err(StorageError::wrong_type(key)),
        };
        // Redis drops a hash once its last field goes
        if now_empty {
            entries.remove(key);
        }
        Ok(())
    }

    fn rpush(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write();
        match entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::List(Vec::new()))
        {
            Entry::List(items) => {
                items.push(value.to_owned());
                Ok(())
            }
            _ => Err(StorageError::wrong_type(key)),
        }
    }

    fn lrange(&self, key: &str) -> StorageResult<Vec<String>> {
        match self.entries.read().get(key) {
            None => Ok(Vec::new()),
            Some(Entry::List(items)) => Ok(items.clone()),
            Some(_) => Err(StorageError::wrong_type(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn exists_and_del() {
        let mut store = MemoryStore::new();
        assert!(!store.exists("k").unwrap());

        store.set("k", "v").unwrap();
        assert!(store.exists("k").unwrap());

        store.del("k").unwrap();
        assert!(!store.exists("k").unwrap());

        // deleting an absent key is a no-op
        store.del("k").unwrap();
    }

    #[test]
    fn hash_fields() {
        let mut store = MemoryStore::new();
        assert!(store.hget("h", "f").unwrap().is_none());

        store.hset("h", "f", "1").unwrap();
        store.hset("h", "g", "2").unwrap();
        assert_eq!(store.hget("h", "f").unwrap().as_deref(), Some("1"));
        assert_eq!(store.hget("h", "g").unwrap().as_deref(), Some("2"));

        store.hdel("h", "f").unwrap();
        assert!(store.hget("h", "f").unwrap().is_none());
        assert_eq!(store.hget("h", "g").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn empty_hash_disappears() {
        let mut store = MemoryStore::new();
        store.hset("h", "f", "1").unwrap();
        store.hdel("h", "f").unwrap();
        assert!(!store.exists("h").unwrap());
    }

    #[test]
    fn list_push_order() {
        let mut store = MemoryStore::new();
        assert!(store.lrange("l").unwrap().is_empty());

        store.rpush("l", "a").unwrap();
        store.rpush("l", "b").unwrap();
        store.rpush("l", "c").unwrap();
        assert_eq!(store.lrange("l").unwrap(), vec!["a", "b", "c"]);

        store.del("l").unwrap();
        assert!(store.lrange("l").unwrap().is_empty());
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let mut store = MemoryStore::new();
        store.set("s", "v").unwrap();
        assert!(matches!(
            store.hget("s", "f"),
            Err(StorageError::WrongType { .. })
        ));
        assert!(matches!(
            store.hset("s", "f", "1"),
            Err(StorageError::WrongType { .. })
        ));
        assert!(matches!(
            store.rpush("s", "x"),
            Err(StorageError::WrongType { .. })
        ));

        store.hset("h", "f", "1").unwrap();
        assert!(matches!(store.get("h"), Err(StorageError::WrongType { .. })));
        assert!(matches!(
            store.lrange("h"),
            Err(StorageError::WrongType { .. })
        ));
    }

    #[test]
    fn clear_removes_everything() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.hset("b", "f", "2").unwrap();
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
    }
}
