//! # redb-backed Storage
//!
//! A disk-backed key-value store using the redb embedded database. One
//! table maps board keys to the encoded arrangement. Every `put` is its own
//! committed write transaction.

use super::KeyValueStore;
use crate::DeckError;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;

/// Table for boards: board key -> encoded arrangement bytes
const BOARDS: TableDefinition<&str, &[u8]> = TableDefinition::new("boards");

/// A disk-backed store using redb.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

fn io_err(e: impl std::fmt::Display) -> DeckError {
    DeckError::IoError(e.to_string())
}

impl RedbStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DeckError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Create the table so that reads on a fresh file see it.
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(BOARDS).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        Ok(Self { db })
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DeckError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(BOARDS).map_err(io_err)?;
        let value = table.get(key).map_err(io_err)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), DeckError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(BOARDS).map_err(io_err)?;
            table.insert(key, value).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn redb_store_round_trip() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("boards.redb");
        let mut store = RedbStore::open(&path).expect("open");
        assert_eq!(store.get("missing").expect("get"), None);
        store.put("blockdeck:board:a", b"[]").expect("put");
        assert_eq!(
            store.get("blockdeck:board:a").expect("get"),
            Some(b"[]".to_vec())
        );
    }

    #[test]
    fn redb_store_survives_reopen() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("boards.redb");
        {
            let mut store = RedbStore::open(&path).expect("open");
            store.put("k", b"persisted").expect("put");
        }
        let store = RedbStore::open(&path).expect("reopen");
        assert_eq!(store.get("k").expect("get"), Some(b"persisted".to_vec()));
    }
}
