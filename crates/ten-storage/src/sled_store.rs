//! `sled`-backed [`KvStore`]. A single tree, raw byte keys and values,
//! `sled::Batch` for atomic writes - grounded on the teacher's `sled`
//! workspace dependency (`sled = "0.34.7"`), used directly rather than
//! through its `typed-sled` column-family wrapper (see DESIGN.md).

use crate::{errors::StorageError, KvBatch, KvStore};

pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }
}

impl KvStore for SledStore {
    type Batch = SledBatch;

    fn has(&self, key: &[u8]) -> Result<bool, StorageError> {
        Ok(self.db.contains_key(key)?)
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>, StorageError> {
        self.db
            .get(key)?
            .map(|v| v.to_vec())
            .ok_or(StorageError::NotFound)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.db.insert(key, value)?;
        Ok(())
    }

    fn new_batch(&self) -> Self::Batch {
        SledBatch {
            db: self.db.clone(),
            inner: sled::Batch::default(),
        }
    }
}

pub struct SledBatch {
    db: sled::Db,
    inner: sled::Batch,
}

impl KvBatch for SledBatch {
    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.inner.insert(key, value);
    }

    fn write(self) -> Result<(), StorageError> {
        self.db.apply_batch(self.inner)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        store.put(b"k", b"v").unwrap();
        assert_eq!(store.get(b"k").unwrap(), b"v");
        assert!(store.has(b"k").unwrap());
    }

    #[test]
    fn missing_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        assert!(matches!(store.get(b"missing"), Err(StorageError::NotFound)));
        assert!(!store.has(b"missing").unwrap());
    }

    #[test]
    fn batch_write_is_all_or_nothing_visible() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        let mut batch = store.new_batch();
        batch.put(b"a".to_vec(), b"1".to_vec());
        batch.put(b"b".to_vec(), b"2".to_vec());
        assert!(!store.has(b"a").unwrap());
        batch.write().unwrap();
        assert_eq!(store.get(b"a").unwrap(), b"1");
        assert_eq!(store.get(b"b").unwrap(), b"2");
    }
}
