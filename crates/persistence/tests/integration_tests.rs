//! Integration tests for the cache layers.

use std::sync::Arc;

use parking_lot::Mutex;
use sidechain_core::{ContractState, FunctionCode, StateValue, StorageItem};
use sidechain_io::SerializableExt;
use sidechain_persistence::*;

fn item(value: &[u8]) -> StateValue {
    StateValue::Storage(StorageItem::new(value.to_vec()))
}

fn stored(store: &MemoryStore, key: &[u8]) -> Option<Vec<u8>> {
    store.get(&DataEntryPrefix::StStorage.full_key(key)).unwrap()
}

fn layered() -> (Arc<MemoryStore>, Arc<dyn DataCache>) {
    let store = Arc::new(MemoryStore::new());
    let root: Arc<dyn DataCache> = Arc::new(DBCache::new(store.clone()));
    (store, root)
}

/// Store that records each batch it is handed.
#[derive(Default)]
struct RecordingStore {
    inner: MemoryStore,
    batches: Mutex<Vec<Vec<BatchOperation>>>,
}

impl Store for RecordingStore {
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn seek(&self, prefix: &[u8]) -> StorageResult<Vec<(Vec<u8>, Vec<u8>)>> {
        self.inner.seek(prefix)
    }

    fn write_batch(&self, batch: Vec<BatchOperation>) -> StorageResult<()> {
        self.batches.lock().push(batch.clone());
        self.inner.write_batch(batch)
    }
}

#[test]
fn test_uncommitted_clone_writes_are_invisible_to_parent() {
    let (store, root) = layered();
    {
        let call = CloneCache::new(root.clone());
        call.put(DataEntryPrefix::StStorage, b"k", item(b"v"));
        assert_eq!(
            call.try_get(DataEntryPrefix::StStorage, b"k").unwrap(),
            Some(item(b"v"))
        );
    }
    assert_eq!(root.try_get(DataEntryPrefix::StStorage, b"k").unwrap(), None);
    assert!(root.write_set().is_empty());
    assert!(store.is_empty());
}

#[test]
fn test_committed_clone_writes_reach_parent_but_not_store() {
    let (store, root) = layered();
    let call = CloneCache::new(root.clone());
    call.put(DataEntryPrefix::StStorage, b"k", item(b"v"));
    call.commit().unwrap();

    assert_eq!(
        root.try_get(DataEntryPrefix::StStorage, b"k").unwrap(),
        Some(item(b"v"))
    );
    assert_eq!(stored(&store, b"k"), None);

    root.commit().unwrap();
    assert_eq!(stored(&store, b"k"), Some(item(b"v").to_bytes()));
    assert!(root.write_set().is_empty());
}

#[test]
fn test_nested_clone_caches_commit_one_layer_at_a_time() {
    let (_store, root) = layered();
    let outer: Arc<dyn DataCache> = Arc::new(CloneCache::new(root.clone()));
    let inner = CloneCache::new(outer.clone());
    inner.put(DataEntryPrefix::StStorage, b"k", item(b"deep"));
    inner.commit().unwrap();

    assert!(outer.try_get(DataEntryPrefix::StStorage, b"k").unwrap().is_some());
    assert!(root.try_get(DataEntryPrefix::StStorage, b"k").unwrap().is_none());

    outer.commit().unwrap();
    assert!(root.try_get(DataEntryPrefix::StStorage, b"k").unwrap().is_some());
}

#[test]
fn test_rollback_discards_buffered_writes() {
    let (_store, root) = layered();
    let call = CloneCache::new(root.clone());
    call.put(DataEntryPrefix::StStorage, b"k", item(b"v"));
    call.rollback();
    call.commit().unwrap();
    assert!(root.try_get(DataEntryPrefix::StStorage, b"k").unwrap().is_none());
}

#[test]
fn test_tombstone_hides_stored_value() {
    let (store, root) = layered();
    root.put(DataEntryPrefix::StStorage, b"k", item(b"v"));
    root.commit().unwrap();

    let call = CloneCache::new(root.clone());
    call.try_delete(DataEntryPrefix::StStorage, b"k");
    assert_eq!(call.try_get(DataEntryPrefix::StStorage, b"k").unwrap(), None);
    assert!(root.try_get(DataEntryPrefix::StStorage, b"k").unwrap().is_some());

    call.commit().unwrap();
    root.commit().unwrap();
    assert_eq!(stored(&store, b"k"), None);
}

#[test]
fn test_delete_of_missing_key_suppresses_read_through() {
    let store = Arc::new(MemoryStore::new());
    let cache = DBCache::new(store.clone());
    cache.try_delete(DataEntryPrefix::StStorage, b"k");
    store
        .put(DataEntryPrefix::StStorage.full_key(b"k"), item(b"late").to_bytes())
        .unwrap();
    assert_eq!(cache.try_get(DataEntryPrefix::StStorage, b"k").unwrap(), None);
}

#[test]
fn test_get_or_add() {
    let (_store, root) = layered();
    let first = root
        .get_or_add(DataEntryPrefix::StStorage, b"k", item(b"a"))
        .unwrap();
    assert_eq!(first, item(b"a"));
    let second = root
        .get_or_add(DataEntryPrefix::StStorage, b"k", item(b"b"))
        .unwrap();
    assert_eq!(second, item(b"a"));

    root.try_delete(DataEntryPrefix::StStorage, b"k");
    let revived = root
        .get_or_add(DataEntryPrefix::StStorage, b"k", item(b"c"))
        .unwrap();
    assert_eq!(revived, item(b"c"));
    assert!(!root.write_set().get(DataEntryPrefix::StStorage, b"k").unwrap().is_deleted);
}

#[test]
fn test_add_rejects_live_entries_at_any_layer() {
    let (_store, root) = layered();
    root.put(DataEntryPrefix::StStorage, b"k", item(b"v"));
    root.commit().unwrap();

    let call = CloneCache::new(root.clone());
    assert!(matches!(
        call.add(DataEntryPrefix::StStorage, b"k", item(b"w")),
        Err(StorageError::AlreadyExists { .. })
    ));
    call.try_delete(DataEntryPrefix::StStorage, b"k");
    call.add(DataEntryPrefix::StStorage, b"k", item(b"w")).unwrap();
    assert_eq!(
        call.try_get(DataEntryPrefix::StStorage, b"k").unwrap(),
        Some(item(b"w"))
    );
}

#[test]
fn test_commit_is_ordered_by_prefixed_key() {
    let store = Arc::new(RecordingStore::default());
    let cache = DBCache::new(store.clone());
    cache.put(DataEntryPrefix::StStorage, b"b", item(b"2"));
    cache.put(DataEntryPrefix::StStorage, b"a", item(b"1"));
    cache.try_delete(DataEntryPrefix::StAccount, b"z");
    cache.put(DataEntryPrefix::StContract, b"c", item(b"3"));
    cache.commit().unwrap();

    let batches = store.batches.lock();
    assert_eq!(batches.len(), 1);
    let keys: Vec<Vec<u8>> = batches[0]
        .iter()
        .map(|op| match op {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key.clone(),
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            vec![0xc2, b'c'],
            vec![0xc3, b'a'],
            vec![0xc3, b'b'],
            vec![0xc4, b'z'],
        ]
    );
    assert!(matches!(batches[0][3], BatchOperation::Delete { .. }));
}

#[test]
fn test_find_merges_layers() {
    let (_store, root) = layered();
    root.put(DataEntryPrefix::StStorage, b"a1", item(b"1"));
    root.put(DataEntryPrefix::StStorage, b"a2", item(b"2"));
    root.put(DataEntryPrefix::StStorage, b"b1", item(b"x"));
    root.commit().unwrap();

    let call = CloneCache::new(root.clone());
    call.try_delete(DataEntryPrefix::StStorage, b"a1");
    call.put(DataEntryPrefix::StStorage, b"a3", item(b"3"));
    call.put(DataEntryPrefix::StStorage, b"a2", item(b"two"));

    let found = call.find(DataEntryPrefix::StStorage, b"a").unwrap();
    assert_eq!(
        found,
        vec![
            (b"a2".to_vec(), item(b"two")),
            (b"a3".to_vec(), item(b"3")),
        ]
    );
}

#[test]
fn test_contract_state_round_trips_through_store() {
    let (store, root) = layered();
    let contract = ContractState {
        code: FunctionCode::new(vec![0x51, 0x66], vec![], 0x05),
        name: "c".into(),
        version: "1".into(),
        author: "a".into(),
        email: "e".into(),
        description: "d".into(),
    };
    let key = contract.code_hash().to_vec();
    root.put(DataEntryPrefix::StContract, &key, StateValue::Contract(contract.clone()));
    root.commit().unwrap();

    let fresh = DBCache::new(store);
    let loaded = fresh.try_get(DataEntryPrefix::StContract, &key).unwrap().unwrap();
    assert_eq!(loaded.as_contract(), Some(&contract));
    assert_eq!(loaded.to_bytes(), contract.to_array());
}

#[test]
fn test_non_state_prefix_is_rejected_on_read() {
    let store = Arc::new(MemoryStore::new());
    store
        .put(DataEntryPrefix::DataHeader.full_key(b"h"), vec![1, 2, 3])
        .unwrap();
    let cache = DBCache::new(store);
    assert!(matches!(
        cache.try_get(DataEntryPrefix::DataHeader, b"h"),
        Err(StorageError::UnsupportedPrefix { prefix: 0x01 })
    ));
}

#[test]
fn test_corrupt_entry_is_reported() {
    let store = Arc::new(MemoryStore::new());
    store
        .put(DataEntryPrefix::StStorage.full_key(b"k"), vec![9])
        .unwrap();
    let cache = DBCache::new(store);
    assert!(matches!(
        cache.try_get(DataEntryPrefix::StStorage, b"k"),
        Err(StorageError::Corrupt { .. })
    ));
}
