//! The cache interface shared by [`DBCache`](crate::DBCache) and
//! [`CloneCache`](crate::CloneCache).

use std::collections::BTreeMap;

use sidechain_core::StateValue;

use crate::error::{StorageError, StorageResult};
use crate::prefix::DataEntryPrefix;
use crate::rw_set::RWSet;

/// A write-buffering view of ledger state.
///
/// Keys are raw keys inside a prefix namespace; the prefix byte is added
/// when the cache talks to the layer beneath it. Mutations stay in the
/// cache's own write-set until [`DataCache::commit`].
pub trait DataCache: Send + Sync {
    /// The current value, reading through to lower layers when the key is
    /// not buffered. A buffered tombstone reads as `None`.
    fn try_get(&self, prefix: DataEntryPrefix, key: &[u8]) -> StorageResult<Option<StateValue>>;

    /// The current value, or `default` recorded as a new entry when absent.
    /// A buffered tombstone is replaced by `default`.
    fn get_or_add(
        &self,
        prefix: DataEntryPrefix,
        key: &[u8],
        default: StateValue,
    ) -> StorageResult<StateValue>;

    /// Records a new entry; fails when the key already reads as live.
    fn add(&self, prefix: DataEntryPrefix, key: &[u8], item: StateValue) -> StorageResult<()>;

    /// Records `item`, replacing any current value.
    fn put(&self, prefix: DataEntryPrefix, key: &[u8], item: StateValue);

    /// Records a tombstone.
    fn try_delete(&self, prefix: DataEntryPrefix, key: &[u8]);

    /// Live entries under `prefix` whose key starts with `key_prefix`, in
    /// key order. Keys are returned without the prefix byte.
    fn find(
        &self,
        prefix: DataEntryPrefix,
        key_prefix: &[u8],
    ) -> StorageResult<Vec<(Vec<u8>, StateValue)>>;

    /// Replays `writes` onto this cache's write-set.
    fn apply(&self, writes: RWSet);

    /// A copy of the buffered writes.
    fn write_set(&self) -> RWSet;

    /// Flushes the write-set one layer down and clears it.
    fn commit(&self) -> StorageResult<()>;
}

/// Decodes a stored value for `prefix`.
pub(crate) fn decode(prefix: DataEntryPrefix, key: &[u8], data: &[u8]) -> StorageResult<StateValue> {
    let kind = prefix.state_kind().ok_or(StorageError::UnsupportedPrefix {
        prefix: prefix.as_byte(),
    })?;
    StateValue::from_bytes(kind, data).map_err(|err| StorageError::corrupt(&prefix.full_key(key), err))
}

/// Overlays buffered writes on entries found beneath them.
pub(crate) fn overlay(
    below: Vec<(Vec<u8>, StateValue)>,
    writes: &RWSet,
    prefix: DataEntryPrefix,
    key_prefix: &[u8],
) -> Vec<(Vec<u8>, StateValue)> {
    let mut entries: BTreeMap<Vec<u8>, StateValue> = below.into_iter().collect();
    for write in writes.find(prefix, key_prefix) {
        match write.value() {
            Some(item) => {
                entries.insert(write.key.clone(), item.clone());
            }
            None => {
                entries.remove(&write.key);
            }
        }
    }
    entries.into_iter().collect()
}
