use std::sync::Arc;

use sidechain_core::UInt168;
use sidechain_persistence::{DataCache, DataEntryPrefix};
use sidechain_vm::ScriptTable;
use tracing::warn;

/// Resolves `APPCALL` targets from the contract namespace of a cache, so a
/// contract deployed earlier in the same execution is already callable.
pub struct CacheCodeTable {
    cache: Arc<dyn DataCache>,
}

impl CacheCodeTable {
    pub fn new(cache: Arc<dyn DataCache>) -> Self {
        Self { cache }
    }
}

impl ScriptTable for CacheCodeTable {
    fn get_script(&self, code_hash: &UInt168) -> Option<Vec<u8>> {
        match self.cache.try_get(DataEntryPrefix::StContract, code_hash.as_bytes()) {
            Ok(value) => value.and_then(|value| value.as_contract().map(|contract| contract.script().to_vec())),
            Err(err) => {
                warn!(%code_hash, %err, "failed to read contract code");
                None
            }
        }
    }
}
