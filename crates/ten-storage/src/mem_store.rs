//! In-memory [`KvStore`], for tests - grounded on the teacher's pattern of
//! providing in-memory/sled dual implementations behind the same trait
//! (`strata-db` / `strata-db-store-sled`).

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{errors::StorageError, KvBatch, KvStore};

#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<Mutex<HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemStore {
    type Batch = MemBatch;

    fn has(&self, key: &[u8]) -> Result<bool, StorageError> {
        Ok(self.inner.lock().unwrap().contains_key(key))
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>, StorageError> {
        self.inner
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.inner.lock().unwrap().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn new_batch(&self) -> Self::Batch {
        MemBatch {
            store: self.inner.clone(),
            pending: Vec::new(),
        }
    }
}

pub struct MemBatch {
    store: Arc<Mutex<HashMap<Vec<u8>, Vec<u8>>>>,
    pending: Vec<(Vec<u8>, Vec<u8>)>,
}

impl KvBatch for MemBatch {
    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.pending.push((key, value));
    }

    fn write(self) -> Result<(), StorageError> {
        let mut store = self.store.lock().unwrap();
        for (key, value) in self.pending {
            store.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get_round_trip() {
        let store = MemStore::new();
        store.put(b"k", b"v").unwrap();
        assert_eq!(store.get(b"k").unwrap(), b"v");
    }

    #[test]
    fn batch_is_not_visible_until_write() {
        let store = MemStore::new();
        let mut batch = store.new_batch();
        batch.put(b"a".to_vec(), b"1".to_vec());
        assert!(!store.has(b"a").unwrap());
        batch.write().unwrap();
        assert_eq!(store.get(b"a").unwrap(), b"1");
    }
}
