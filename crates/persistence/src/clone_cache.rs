use std::sync::Arc;

use parking_lot::RwLock;
use sidechain_core::StateValue;
use tracing::trace;

use crate::data_cache::{overlay, DataCache};
use crate::error::{StorageError, StorageResult};
use crate::prefix::DataEntryPrefix;
use crate::rw_set::RWSet;

/// A call-scoped write-set layered over a parent cache.
///
/// Reads fall through to the parent; writes stay local. [`commit`] merges
/// them into the parent's write-set and never touches the store, so a call
/// is rolled back by dropping its clone cache.
///
/// [`commit`]: DataCache::commit
pub struct CloneCache {
    outer: Arc<dyn DataCache>,
    rw_set: RwLock<RWSet>,
}

impl CloneCache {
    pub fn new(outer: Arc<dyn DataCache>) -> Self {
        Self {
            outer,
            rw_set: RwLock::new(RWSet::new()),
        }
    }

    pub fn outer(&self) -> &Arc<dyn DataCache> {
        &self.outer
    }

    /// Drops every buffered write.
    pub fn rollback(&self) {
        let mut rw_set = self.rw_set.write();
        trace!(writes = rw_set.len(), "discarded clone cache");
        rw_set.clear();
    }
}

impl DataCache for CloneCache {
    fn try_get(&self, prefix: DataEntryPrefix, key: &[u8]) -> StorageResult<Option<StateValue>> {
        if let Some(write) = self.rw_set.read().get(prefix, key) {
            return Ok(write.value().cloned());
        }
        self.outer.try_get(prefix, key)
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
            None => self.outer.try_get(prefix, key)?.unwrap_or(default),
        };
        rw_set.put(prefix, key, item.clone());
        Ok(item)
    }

    fn add(&self, prefix: DataEntryPrefix, key: &[u8], item: StateValue) -> StorageResult<()> {
        let mut rw_set = self.rw_set.write();
        if !rw_set.contains(prefix, key) && self.outer.try_get(prefix, key)?.is_some() {
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
        let below = self.outer.find(prefix, key_prefix)?;
        Ok(overlay(below, &self.rw_set.read(), prefix, key_prefix))
    }

    fn apply(&self, writes: RWSet) {
        writes.merge_into(&mut self.rw_set.write());
    }

    fn write_set(&self) -> RWSet {
        self.rw_set.read().clone()
    }

    fn commit(&self) -> StorageResult<()> {
        let writes = std::mem::take(&mut *self.rw_set.write());
        trace!(writes = writes.len(), "merged clone cache into parent");
        self.outer.apply(writes);
        Ok(())
    }
}
