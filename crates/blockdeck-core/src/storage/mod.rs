//! # Storage Module
//!
//! Key-value storage for persisted boards.
//!
//! - `MemoryStore` - volatile `BTreeMap` store with an optional byte quota
//! - `RedbStore` - disk-backed store using the redb embedded database
//! - `StorageBackend` - the enum a gateway holds, dispatching to either

pub mod redb_store;

pub use redb_store::RedbStore;

use crate::DeckError;
use std::collections::BTreeMap;
use std::path::Path;

/// A byte-oriented key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DeckError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), DeckError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-memory store.
///
/// With a quota set, a `put` that would make the stored values exceed the
/// quota fails with `QuotaExceeded`, the way a browser's local storage runs
/// out of room.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
    quota: Option<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that holds at most `bytes` bytes of values.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(bytes),
        }
    }

    /// Total bytes of stored values.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DeckError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), DeckError> {
        if let Some(quota) = self.quota {
            let replaced = self.entries.get(key).map_or(0, Vec::len);
            let available = quota.saturating_sub(self.used_bytes().saturating_sub(replaced));
            if value.len() > available {
                return Err(DeckError::QuotaExceeded {
                    needed: value.len(),
                    available,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

// =============================================================================
// BACKEND
// =============================================================================

/// Storage backend for a persistence gateway.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl StorageBackend {
    /// Open or create a redb-backed store at `path`.
    pub fn redb(path: impl AsRef<Path>) -> Result<Self, DeckError> {
        Ok(Self::Persistent(RedbStore::open(path)?))
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Persistent(_))
    }
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

impl KeyValueStore for StorageBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DeckError> {
        match self {
            Self::InMemory(store) => store.get(key),
            Self::Persistent(store) => store.get(key),
        }
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), DeckError> {
        match self {
            Self::InMemory(store) => store.put(key, value),
            Self::Persistent(store) => store.put(key, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").expect("get"), None);
        store.put("k", b"value").expect("put");
        assert_eq!(store.get("k").expect("get"), Some(b"value".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn quota_rejects_oversized_writes() {
        let mut store = MemoryStore::with_quota(8);
        store.put("a", b"12345").expect("fits");
        let err = store.put("b", b"1234");
        assert!(matches!(
            err,
            Err(DeckError::QuotaExceeded {
                needed: 4,
                available: 3
            })
        ));
        assert_eq!(store.get("b").expect("get"), None);
    }

    #[test]
    fn quota_counts_replaced_value_as_free() {
        let mut store = MemoryStore::with_quota(8);
        store.put("a", b"12345").expect("fits");
        store.put("a", b"12345678").expect("replacement fits");
        assert_eq!(store.used_bytes(), 8);
    }

    #[test]
    fn default_backend_is_volatile() {
        let mut backend = StorageBackend::default();
        assert!(!backend.is_persistent());
        backend.put("k", b"v").expect("put");
        assert_eq!(backend.get("k").expect("get"), Some(b"v".to_vec()));
    }
}
