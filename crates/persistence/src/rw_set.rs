//! The buffered write-set shared by every cache layer.

use std::collections::btree_map::{self, BTreeMap};

use sidechain_core::StateValue;

use crate::error::{StorageError, StorageResult};
use crate::prefix::DataEntryPrefix;

/// A pending mutation: a live value or a tombstone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub prefix: DataEntryPrefix,
    pub key: Vec<u8>,
    pub item: Option<StateValue>,
    pub is_deleted: bool,
}

impl Write {
    /// The live value, `None` for a tombstone.
    pub fn value(&self) -> Option<&StateValue> {
        if self.is_deleted {
            None
        } else {
            self.item.as_ref()
        }
    }

    pub fn full_key(&self) -> Vec<u8> {
        self.prefix.full_key(&self.key)
    }
}

/// Pending writes keyed by `prefix || key`, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RWSet {
    writes: BTreeMap<Vec<u8>, Write>,
}

impl RWSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new entry. Fails when a live entry is already buffered
    /// under the key; a tombstone is replaced.
    pub fn add(
        &mut self,
        prefix: DataEntryPrefix,
        key: &[u8],
        item: StateValue,
    ) -> StorageResult<()> {
        let full_key = prefix.full_key(key);
        if let Some(existing) = self.writes.get(&full_key) {
            if !existing.is_deleted {
                return Err(StorageError::already_exists(&full_key));
            }
        }
        self.insert(full_key, prefix, key, item);
        Ok(())
    }

    /// Records `item`, replacing whatever is buffered.
    pub fn put(&mut self, prefix: DataEntryPrefix, key: &[u8], item: StateValue) {
        self.insert(prefix.full_key(key), prefix, key, item);
    }

    /// Records a tombstone, whether or not the key was buffered.
    pub fn delete(&mut self, prefix: DataEntryPrefix, key: &[u8]) {
        let full_key = prefix.full_key(key);
        match self.writes.get_mut(&full_key) {
            Some(write) => {
                write.item = None;
                write.is_deleted = true;
            }
            None => {
                self.writes.insert(
                    full_key,
                    Write {
                        prefix,
                        key: key.to_vec(),
                        item: None,
                        is_deleted: true,
                    },
                );
            }
        }
    }

    pub fn get(&self, prefix: DataEntryPrefix, key: &[u8]) -> Option<&Write> {
        self.writes.get(&prefix.full_key(key))
    }

    pub fn contains(&self, prefix: DataEntryPrefix, key: &[u8]) -> bool {
        self.writes.contains_key(&prefix.full_key(key))
    }

    /// Buffered writes under `prefix` whose key starts with `key_prefix`.
    pub fn find<'a>(
        &'a self,
        prefix: DataEntryPrefix,
        key_prefix: &[u8],
    ) -> impl Iterator<Item = &'a Write> + 'a {
        let start = prefix.full_key(key_prefix);
        let bound = start.clone();
        self.writes
            .range(start..)
            .take_while(move |(full_key, _)| full_key.starts_with(&bound))
            .map(|(_, write)| write)
    }

    pub fn iter(&self) -> btree_map::Values<'_, Vec<u8>, Write> {
        self.writes.values()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }

    /// Replays every write onto `target`: tombstones as deletes, live
    /// entries as puts.
    pub fn merge_into(self, target: &mut RWSet) {
        for write in self.writes.into_values() {
            match write.item {
                Some(item) if !write.is_deleted => target.put(write.prefix, &write.key, item),
                _ => target.delete(write.prefix, &write.key),
            }
        }
    }

    fn insert(&mut self, full_key: Vec<u8>, prefix: DataEntryPrefix, key: &[u8], item: StateValue) {
        self.writes.insert(
            full_key,
            Write {
                prefix,
                key: key.to_vec(),
                item: Some(item),
                is_deleted: false,
            },
        );
    }
}

impl IntoIterator for RWSet {
    type Item = Write;
    type IntoIter = btree_map::IntoValues<Vec<u8>, Write>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_values()
    }
}
