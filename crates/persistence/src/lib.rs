//! # Sidechain Persistence Layer
//!
//! Transactional state storage for the contract engine.
//!
//! - [`Store`] is the byte-keyed persistent layer; [`MemoryStore`] is the
//!   in-memory implementation.
//! - [`RWSet`] buffers puts and tombstones keyed by `prefix || key`.
//! - [`DBCache`] puts a write-set in front of a store and flushes it on
//!   commit in key order.
//! - [`CloneCache`] layers a call-scoped write-set over any
//!   [`DataCache`]; committing merges it into the parent, dropping it
//!   rolls the call back.
//!
//! ```rust
//! use std::sync::Arc;
//! use sidechain_core::{StateValue, StorageItem};
//! use sidechain_persistence::{CloneCache, DBCache, DataCache, DataEntryPrefix, MemoryStore, Store};
//!
//! # fn main() -> Result<(), sidechain_persistence::StorageError> {
//! let store = Arc::new(MemoryStore::new());
//! let root: Arc<dyn DataCache> = Arc::new(DBCache::new(store.clone()));
//!
//! let call = CloneCache::new(root.clone());
//! call.put(DataEntryPrefix::StStorage, b"key", StateValue::Storage(StorageItem::new(b"v".to_vec())));
//! call.commit()?;
//! assert!(root.try_get(DataEntryPrefix::StStorage, b"key")?.is_some());
//! assert!(store.get(&DataEntryPrefix::StStorage.full_key(b"key"))?.is_none());
//!
//! root.commit()?;
//! assert!(store.get(&DataEntryPrefix::StStorage.full_key(b"key"))?.is_some());
//! # Ok(())
//! # }
//! ```

pub mod clone_cache;
pub mod data_cache;
pub mod db_cache;
pub mod error;
pub mod prefix;
pub mod rw_set;
pub mod store;

pub use clone_cache::CloneCache;
pub use data_cache::DataCache;
pub use db_cache::DBCache;
pub use error::{StorageError, StorageResult};
pub use prefix::DataEntryPrefix;
pub use rw_set::{RWSet, Write};
pub use store::{BatchOperation, MemoryStore, Store};
