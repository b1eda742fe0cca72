use std::sync::Arc;

use parking_lot::RwLock;
use sidechain_core::StateValue;
use tracing::debug;

use crate::data_cache::{decode, overlay, DataCache};
use crate::error::{StorageError, StorageResult};
use crate::prefix::DataEntryPrefix;
use crate::rw_set::RWSet;
use crate::store::{BatchOperation, Store};

/// The outermost cache: a write-set in front of a [`Store`].
pub struct DBCache {
    store: Arc<dyn Store>,
    rw_set: RwLock<RWSet>,
}

impl DBCache {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            rw_set: RwLock::new(RWSet::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    fn read_store(&self, prefix: DataEntryPrefix, key: &[u8]) -> StorageResult<Option<StateValue>> {
        match self.store.get(&prefix.full_key(key))? {
            Some(data) => decode(prefix, key, &data).map(Some),
            None => Ok(None),
        }
    }
}

impl DataCache for DBCache {
    fn try_get(&self, prefix: DataEntryPrefix, key: &[u8]) -> StorageResult<Option<StateValue>> {
        if let Some(write) = self.rw_set.read().get(prefix, key) {
            return Ok(write.value().cloned());
        }
        self.read_store(prefix, key)
    }

    fn get_or_add(
        &self,
        prefix: DataEntryPrefix,
        key: &[u8],
        default: StateValue,
    ) -> StorageResult<StateValue> {
        let mut rw_set = self.rw_set.write();
        let item = match rw_set.get(prefix, key) {
            Some(write) => write.value().cloned().unwrap_or(default),
            None => self.read_store(prefix, key)?.unwrap_or(default),
        };
        rw_set.put(prefix, key, item.clone());
        Ok(item)
    }

    fn add(&self, prefix: DataEntryPrefix, key: &[u8], item: StateValue) -> StorageResult<()> {
        let mut rw_set = self.rw_set.write();
        if !rw_set.contains(prefix, key) && self.read_store(prefix, key)?.is_some() {
            return Err(StorageError::already_exists(&prefix.full_key(key)));
        }
        rw_set.add(prefix, key, item)
    }

    fn put(&self, prefix: DataEntryPrefix, key: &[u8], item: StateValue) {
        self.rw_set.write().put(prefix, key, item);
    }

    fn try_delete(&self, prefix: DataEntryPrefix, key: &[u8]) {
        self.rw_set.write().delete(prefix, key);
    }

    fn find(
        &self,
        prefix: DataEntryPrefix,
        key_prefix: &[u8],
    ) -> StorageResult<Vec<(Vec<u8>, StateValue)>> {
        let mut stored = Vec::new();
        for (full_key, data) in self.store.seek(&prefix.full_key(key_prefix))? {
            let key = full_key[1..].to_vec();
            let item = decode(prefix, &key, &data)?;
            stored.push((key, item));
        }
        Ok(overlay(stored, &self.rw_set.read(), prefix, key_prefix))
    }

    fn apply(&self, writes: RWSet) {
        writes.merge_into(&mut self.rw_set.write());
    }

    fn write_set(&self) -> RWSet {
        self.rw_set.read().clone()
    }

    /// Writes every buffered entry to the store in one batch, ordered by
    /// `prefix || key`.
    fn commit(&self) -> StorageResult<()> {
        let mut rw_set = self.rw_set.write();
        let mut batch = Vec::with_capacity(rw_set.len());
        let (mut puts, mut deletes) = (0usize, 0usize);
        for write in rw_set.iter() {
            match write.value() {
                Some(item) => {
                    puts += 1;
                    batch.push(BatchOperation::Put {
                        key: write.full_key(),
                        value: item.to_bytes(),
                    });
                }
                None => {
                    deletes += 1;
                    batch.push(BatchOperation::Delete {
                        key: write.full_key(),
                    });
                }
            }
        }
        self.store.write_batch(batch)?;
        rw_set.clear();
        debug!(puts, deletes, "flushed write-set to store");
        Ok(())
    }
}
