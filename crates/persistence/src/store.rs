//! The persistent key-value layer beneath the caches.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::StorageResult;

/// A single mutation applied by [`Store::write_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// Byte-keyed persistent storage.
///
/// Implementations must apply a batch atomically: either every operation
/// is visible afterwards or none is.
pub trait Store: Send + Sync {
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Every entry whose key starts with `prefix`, in ascending key order.
    fn seek(&self, prefix: &[u8]) -> StorageResult<Vec<(Vec<u8>, Vec<u8>)>>;

    fn write_batch(&self, batch: Vec<BatchOperation>) -> StorageResult<()>;

    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        self.write_batch(vec![BatchOperation::Put { key, value }])
    }

    fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.write_batch(vec![BatchOperation::Delete { key: key.to_vec() }])
    }

    fn contains(&self, key: &[u8]) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// An in-memory [`Store`] backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    pub fn reset(&self) {
        self.data.write().clear();
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn seek(&self, prefix: &[u8]) -> StorageResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let data = self.data.read();
        Ok(data
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn write_batch(&self, batch: Vec<BatchOperation>) -> StorageResult<()> {
        let mut data = self.data.write();
        for operation in batch {
            match operation {
                BatchOperation::Put { key, value } => {
                    data.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }
}
