//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use sidechain_config::VmSettings;
use sidechain_core::{
    to_code_hash, AccountState, AssetState, Block, ContractState, FunctionCode, Header, Output,
    StateValue, StorageItem, StorageKey, Transaction, UInt168, UInt256,
};
use sidechain_io::SerializableExt;
use sidechain_persistence::{DBCache, DataCache, DataEntryPrefix, MemoryStore};
use sidechain_smart_contract::{ApplicationEngine, Blockchain};
use sidechain_vm::{OpCode, ScriptBuilder, TriggerType};

/// Compressed secp256r1 generator point.
pub const GENERATOR: &str = "036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";

pub fn generator_key() -> Vec<u8> {
    hex::decode(GENERATOR).unwrap()
}

/// In-memory chain of `len` headers with timestamps `1000 + height`.
#[derive(Default)]
pub struct FakeChain {
    pub blocks: Vec<Block>,
    pub transactions: HashMap<UInt256, (Transaction, u32)>,
    pub assets: HashMap<UInt256, AssetState>,
    pub accounts: HashMap<UInt168, AccountState>,
}

impl FakeChain {
    pub fn with_blocks(len: u32) -> Self {
        let mut chain = Self::default();
        let mut previous = UInt256::zero();
        for height in 0..len {
            let header = Header {
                version: 0,
                previous,
                merkle_root: UInt256::zero(),
                timestamp: 1000 + height,
                bits: 0,
                height,
                nonce: height,
            };
            previous = header.hash();
            chain.blocks.push(Block {
                header,
                transactions: Vec::new(),
            });
        }
        chain
    }

    pub fn add_transaction(&mut self, tx: Transaction, height: u32) -> UInt256 {
        let hash = tx.hash();
        self.transactions.insert(hash, (tx, height));
        hash
    }

    fn find_block(&self, hash: &UInt256) -> Option<&Block> {
        self.blocks.iter().find(|block| block.hash() == *hash)
    }
}

impl Blockchain for FakeChain {
    fn height(&self) -> u32 {
        self.blocks.len().saturating_sub(1) as u32
    }

    fn block_hash(&self, height: u32) -> Option<UInt256> {
        self.blocks.get(height as usize).map(Block::hash)
    }

    fn header(&self, hash: &UInt256) -> Option<Header> {
        self.find_block(hash).map(|block| block.header.clone())
    }

    fn block(&self, hash: &UInt256) -> Option<Block> {
        self.find_block(hash).cloned()
    }

    fn transaction(&self, hash: &UInt256) -> Option<(Transaction, u32)> {
        self.transactions.get(hash).cloned()
    }

    fn account(&self, program_hash: &UInt168) -> Option<AccountState> {
        self.accounts.get(program_hash).cloned()
    }

    fn asset(&self, asset_id: &UInt256) -> Option<AssetState> {
        self.assets.get(asset_id).cloned()
    }

    fn unspents(&self, tx_id: &UInt256) -> Option<Vec<Output>> {
        self.transactions.get(tx_id).map(|(tx, _)| tx.outputs.clone())
    }
}

pub fn memory_cache() -> Arc<DBCache> {
    Arc::new(DBCache::new(Arc::new(MemoryStore::new())))
}

pub fn contract(code: Vec<u8>) -> ContractState {
    ContractState {
        code: FunctionCode::new(code, vec![0x05], 0x05),
        name: "fixture".into(),
        version: "1.0".into(),
        author: "tests".into(),
        email: "tests@example.org".into(),
        description: "integration fixture".into(),
    }
}

/// Stores `code` as a deployed contract and returns its code hash.
pub fn deploy(cache: &dyn DataCache, code: Vec<u8>) -> UInt168 {
    let contract = contract(code);
    let code_hash = contract.code_hash();
    assert_eq!(code_hash, to_code_hash(contract.script()));
    cache.put(DataEntryPrefix::StContract, code_hash.as_bytes(), contract.into());
    code_hash
}

pub fn storage_key(code_hash: UInt168, key: &[u8]) -> Vec<u8> {
    StorageKey::new(code_hash, key.to_vec()).to_array()
}

pub fn stored_value(cache: &dyn DataCache, code_hash: UInt168, key: &[u8]) -> Option<Vec<u8>> {
    cache
        .try_get(DataEntryPrefix::StStorage, &storage_key(code_hash, key))
        .unwrap()
        .and_then(|value| value.as_storage().map(|item| item.value.clone()))
}

pub fn seed_storage(cache: &dyn DataCache, code_hash: UInt168, key: &[u8], value: &[u8]) {
    cache.put(
        DataEntryPrefix::StStorage,
        &storage_key(code_hash, key),
        StateValue::Storage(StorageItem::new(value.to_vec())),
    );
}

/// A script that calls into `code_hash`.
pub fn app_call(code_hash: &UInt168) -> Vec<u8> {
    let mut builder = ScriptBuilder::new();
    builder.emit_app_call(code_hash, false).emit_opcode(OpCode::RET);
    builder.to_array()
}

/// Runs `script` as an application of an invocation transaction for it.
pub fn execute(chain: FakeChain, parent: Arc<dyn DataCache>, script: Vec<u8>) -> ApplicationEngine {
    let tx = Transaction::invoke(script.clone());
    execute_with(chain, parent, script, tx, TriggerType::Application)
}

pub fn execute_with(
    chain: FakeChain,
    parent: Arc<dyn DataCache>,
    script: Vec<u8>,
    tx: Transaction,
    trigger: TriggerType,
) -> ApplicationEngine {
    let mut engine = ApplicationEngine::new(
        trigger,
        Some(Rc::new(tx)),
        Rc::new(chain),
        parent,
        &VmSettings::default(),
    );
    engine.load_script(script).unwrap();
    engine.execute().unwrap();
    engine
}
