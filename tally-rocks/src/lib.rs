//! RocksDB-backed store for Tally.

use std::path::Path;

use rocksdb::{DB, Options};
use tally_core::Store;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("RocksDB error: {0}")]
pub struct RocksError(#[from] rocksdb::Error);

/// A persistent store backed by RocksDB.
///
/// RocksDB holds a lock on the directory, so a second process opening the
/// same path fails instead of sharing it.
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Opens a RocksDB store at the given path.
    ///
    /// Creates the database if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RocksError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }
}

impl Store for RocksStore {
    type Error = RocksError;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.db.get(key.as_bytes())?)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    fn has(&self, key: &str) -> Result<bool, Self::Error> {
        Ok(self.db.get_pinned(key.as_bytes())?.is_some())
    }

    fn delete(&self, key: &str) -> Result<(), Self::Error> {
        self.db.delete(key.as_bytes())?;
        Ok(())
    }
}
