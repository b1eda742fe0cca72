//! State-mutating syscalls layered over [`StateReader`].
//!
//! Writes go to the [`DataCache`] the machine was built with, normally the
//! call-scoped [`CloneCache`](sidechain_persistence::CloneCache) of one
//! invocation, so a faulted script leaves the ledger untouched.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use sidechain_config::{
    ASSET_EXPIRATION_BLOCKS, MAX_ASSET_NAME_SIZE, MAX_ASSET_PRECISION,
    MAX_CONTRACT_DESCRIPTION_SIZE, MAX_CONTRACT_FIELD_SIZE, MAX_CONTRACT_SIZE,
    MAX_STORAGE_KEY_SIZE,
};
use sidechain_core::{
    AssetState, AssetType, ContractState, Fixed64, FunctionCode, StorageContext,
    StorageItem, StorageKey, UInt168, UInt256,
};
use sidechain_io::SerializableExt;
use sidechain_persistence::{DataCache, DataEntryPrefix};
use sidechain_vm::{
    ExecutionEngine, InteropDescriptor, InteropInterface, InteropService, StackItem, TriggerType,
    VmResult,
};
use tracing::{info, trace};

use crate::args::{
    container, executing_hash, pop_asset, pop_bytes, pop_contract, pop_i64, pop_storage_context,
    pop_u32, pop_u8, pop_uint168, pop_uint256,
};
use crate::blockchain::Blockchain;
use crate::error::{ContractError, ContractResult};
use crate::events::EventRecorder;
use crate::iterators::StorageIterator;
use crate::state_reader::{StateReader, DEFAULT_PRICE, QUERY_PRICE};
use crate::witness::{check_witness, public_key_program_hash};

pub const STORAGE_READ_PRICE: i64 = 100;
pub const STORAGE_WRITE_PRICE: i64 = 1000;
pub const CONTRACT_CREATE_PRICE: i64 = 500;
pub const ASSET_CREATE_PRICE: i64 = 5000;
pub const ASSET_RENEW_PRICE: i64 = 5000;

/// What the mutating handlers share.
struct Ledger {
    chain: Rc<dyn Blockchain>,
    cache: Arc<dyn DataCache>,
    /// Contracts created during this execution, mapped to the script that
    /// created them.
    created: RefCell<HashMap<UInt168, UInt168>>,
}

type LedgerHandler = fn(&Ledger, &mut ExecutionEngine) -> VmResult<()>;

const LEDGER_HANDLERS: &[(&str, i64, LedgerHandler)] = &[
    ("Neo.Asset.Create", ASSET_CREATE_PRICE, asset_create),
    ("Neo.Asset.Renew", ASSET_RENEW_PRICE, asset_renew),
    ("Neo.Contract.Create", CONTRACT_CREATE_PRICE, contract_create),
    ("Neo.Contract.Destroy", DEFAULT_PRICE, contract_destroy),
    ("Neo.Contract.GetStorageContext", DEFAULT_PRICE, contract_get_storage_context),
    ("Neo.Blockchain.GetContract", QUERY_PRICE, blockchain_get_contract),
    ("Neo.Blockchain.GetAsset", QUERY_PRICE, blockchain_get_asset),
    ("Neo.Storage.Get", STORAGE_READ_PRICE, storage_get),
    ("Neo.Storage.Put", STORAGE_WRITE_PRICE, storage_put),
    ("Neo.Storage.Delete", STORAGE_READ_PRICE, storage_delete),
    ("Neo.Storage.Find", STORAGE_READ_PRICE, storage_find),
];

/// The full syscall surface: every [`StateReader`] call plus the calls
/// that create assets and contracts and touch contract storage.
pub struct StateMachine {
    reader: StateReader,
    ledger: Rc<Ledger>,
}

impl StateMachine {
    pub fn new(chain: Rc<dyn Blockchain>, cache: Arc<dyn DataCache>) -> Self {
        Self {
            reader: StateReader::new(Rc::clone(&chain)),
            ledger: Rc::new(Ledger {
                chain,
                cache,
                created: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn reader(&self) -> &StateReader {
        &self.reader
    }

    pub fn events(&self) -> &EventRecorder {
        self.reader.events()
    }

    pub fn cache(&self) -> &Arc<dyn DataCache> {
        &self.ledger.cache
    }

    /// A registry holding every syscall. Where both surfaces define a name
    /// the cache-aware handler wins.
    pub fn service(&self) -> InteropService {
        let mut service = InteropService::new();
        for &(name, price, handler) in LEDGER_HANDLERS {
            let ledger = Rc::clone(&self.ledger);
            service.register(InteropDescriptor::new(name, price, move |engine| {
                handler(&ledger, engine)
            }));
        }
        self.reader.register_into(&mut service);
        service
    }
}

fn pop_limited(engine: &mut ExecutionEngine, what: &'static str, limit: usize) -> VmResult<Vec<u8>> {
    let bytes = pop_bytes(engine)?;
    if bytes.len() > limit {
        return Err(ContractError::invalid_argument(
            what,
            format!("{} bytes exceeds the limit of {limit}", bytes.len()),
        )
        .into());
    }
    Ok(bytes)
}

fn pop_text(engine: &mut ExecutionEngine, what: &'static str, limit: usize) -> VmResult<String> {
    let bytes = pop_limited(engine, what, limit)?;
    String::from_utf8(bytes).map_err(|_| ContractError::invalid_argument(what, "not valid UTF-8").into())
}

/// An asset as this execution sees it: buffered writes first, then the
/// chain.
fn asset_state(ledger: &Ledger, asset_id: &UInt256) -> ContractResult<Option<AssetState>> {
    if let Some(value) = ledger.cache.try_get(DataEntryPrefix::StAssetState, asset_id.as_bytes())? {
        return Ok(value.as_asset().cloned());
    }
    Ok(ledger.chain.asset(asset_id))
}

fn contract_state(ledger: &Ledger, code_hash: &UInt168) -> ContractResult<Option<ContractState>> {
    Ok(ledger
        .cache
        .try_get(DataEntryPrefix::StContract, code_hash.as_bytes())?
        .and_then(|value| value.as_contract().cloned()))
}

// Assets

fn asset_create(ledger: &Ledger, engine: &mut ExecutionEngine) -> VmResult<()> {
    let tx = container(engine)?;
    let asset_type = AssetType::try_from(pop_u8(engine, "asset type")?).map_err(ContractError::from)?;
    let name = pop_text(engine, "asset name", MAX_ASSET_NAME_SIZE)?;

    let amount = pop_i64(engine, "asset amount")?;
    if amount == 0 {
        return Err(ContractError::invalid_argument("asset amount", "must not be zero").into());
    }
    let precision = pop_u8(engine, "asset precision")?;
    if precision > MAX_ASSET_PRECISION {
        return Err(ContractError::invalid_argument(
            "asset precision",
            format!("{precision} exceeds {MAX_ASSET_PRECISION}"),
        )
        .into());
    }
    let unit = 10i64.pow(u32::from(MAX_ASSET_PRECISION - precision));
    if amount % unit != 0 {
        return Err(ContractError::invalid_argument(
            "asset amount",
            format!("{amount} is not a multiple of {unit}"),
        )
        .into());
    }

    let owner = pop_bytes(engine)?;
    let owner_hash = public_key_program_hash(&owner)?;
    if !check_witness(ledger.chain.as_ref(), &tx, &owner_hash)? {
        return Err(ContractError::WitnessMissing {
            program_hash: owner_hash.to_string(),
        }
        .into());
    }
    let admin = pop_uint168(engine)?;
    let issuer = pop_uint168(engine)?;

    let asset_id = tx.hash();
    let asset = AssetState {
        asset_id,
        asset_type,
        name,
        amount: Fixed64::from_units(amount),
        available: Fixed64::ZERO,
        precision,
        owner,
        admin,
        issuer,
        expiration: ledger
            .chain
            .height()
            .saturating_add(1)
            .saturating_add(ASSET_EXPIRATION_BLOCKS),
        is_frozen: false,
    };
    ledger
        .cache
        .add(DataEntryPrefix::StAssetState, asset_id.as_bytes(), asset.clone().into())
        .map_err(ContractError::from)?;
    info!(%asset_id, name = %asset.name, "asset created");
    engine.push(StackItem::from_interop(asset));
    Ok(())
}

fn asset_renew(ledger: &Ledger, engine: &mut ExecutionEngine) -> VmResult<()> {
    let handle = pop_asset(engine)?;
    let years = pop_u32(engine, "renewal years")?;
    let asset_id = handle.asset_id;

    let mut asset =
        asset_state(ledger, &asset_id)?.ok_or_else(|| ContractError::not_found("asset", asset_id))?;
    let overflow = || ContractError::invalid_argument("renewal years", format!("{years} overflows the expiration"));
    let extension = years.checked_mul(ASSET_EXPIRATION_BLOCKS).ok_or_else(overflow)?;
    let start = asset.expiration.max(ledger.chain.height().saturating_add(1));
    asset.expiration = start.checked_add(extension).ok_or_else(overflow)?;

    let expiration = asset.expiration;
    ledger
        .cache
        .put(DataEntryPrefix::StAssetState, asset_id.as_bytes(), asset.into());
    trace!(%asset_id, expiration, "asset renewed");
    engine.push(StackItem::from(expiration));
    Ok(())
}

fn blockchain_get_asset(ledger: &Ledger, engine: &mut ExecutionEngine) -> VmResult<()> {
    let asset_id = pop_uint256(engine)?;
    let asset =
        asset_state(ledger, &asset_id)?.ok_or_else(|| ContractError::not_found("asset", asset_id))?;
    engine.push(StackItem::from_interop(asset));
    Ok(())
}

// Contracts

fn contract_create(ledger: &Ledger, engine: &mut ExecutionEngine) -> VmResult<()> {
    let code = pop_limited(engine, "contract code", MAX_CONTRACT_SIZE)?;
    let parameter_types = pop_limited(engine, "parameter list", MAX_CONTRACT_FIELD_SIZE)?;
    let return_type = pop_u8(engine, "return type")?;
    let name = pop_text(engine, "contract name", MAX_CONTRACT_FIELD_SIZE)?;
    let version = pop_text(engine, "contract version", MAX_CONTRACT_FIELD_SIZE)?;
    let author = pop_text(engine, "contract author", MAX_CONTRACT_FIELD_SIZE)?;
    let email = pop_text(engine, "contract email", MAX_CONTRACT_FIELD_SIZE)?;
    let description = pop_text(engine, "contract description", MAX_CONTRACT_DESCRIPTION_SIZE)?;

    let contract = ContractState {
        code: FunctionCode::new(code, parameter_types, return_type),
        name,
        version,
        author,
        email,
        description,
    };
    let code_hash = contract.code_hash();
    let existed = contract_state(ledger, &code_hash)?.is_some();
    let stored = ledger
        .cache
        .get_or_add(DataEntryPrefix::StContract, code_hash.as_bytes(), contract.into())
        .map_err(ContractError::from)?;
    let contract = stored
        .as_contract()
        .cloned()
        .ok_or_else(|| ContractError::not_found("contract", code_hash))?;

    if !existed {
        let creator = executing_hash(engine)?;
        ledger.created.borrow_mut().insert(code_hash, creator);
        info!(%code_hash, %creator, "contract created");
    }
    engine.push(StackItem::from_interop(contract));
    Ok(())
}

/// Removes the executing contract and all of its storage.
fn contract_destroy(ledger: &Ledger, engine: &mut ExecutionEngine) -> VmResult<()> {
    let code_hash = executing_hash(engine)?;
    if contract_state(ledger, &code_hash)?.is_none() {
        return Err(ContractError::ContractNotDeployed {
            code_hash: code_hash.to_string(),
        }
        .into());
    }
    ledger
        .cache
        .try_delete(DataEntryPrefix::StContract, code_hash.as_bytes());
    let entries = ledger
        .cache
        .find(DataEntryPrefix::StStorage, code_hash.as_bytes())
        .map_err(ContractError::from)?;
    for (key, _) in &entries {
        ledger.cache.try_delete(DataEntryPrefix::StStorage, key);
    }
    info!(%code_hash, storage_entries = entries.len(), "contract destroyed");
    Ok(())
}

/// Only the script that created a contract in this execution may write to
/// its storage through this call.
fn contract_get_storage_context(ledger: &Ledger, engine: &mut ExecutionEngine) -> VmResult<()> {
    let contract = pop_contract(engine)?;
    let code_hash = contract.code_hash();
    let caller = executing_hash(engine)?;
    if ledger.created.borrow().get(&code_hash) != Some(&caller) {
        return Err(ContractError::NotContractCreator {
            code_hash: code_hash.to_string(),
        }
        .into());
    }
    engine.push(StackItem::from_interop(StorageContext::new(code_hash)));
    Ok(())
}

fn blockchain_get_contract(ledger: &Ledger, engine: &mut ExecutionEngine) -> VmResult<()> {
    let code_hash = pop_uint168(engine)?;
    let contract = contract_state(ledger, &code_hash)?
        .ok_or_else(|| ContractError::not_found("contract", code_hash))?;
    engine.push(StackItem::from_interop(contract));
    Ok(())
}

// Storage

/// The addressed contract must be deployed.
fn check_storage_context(ledger: &Ledger, context: &StorageContext) -> ContractResult<()> {
    match contract_state(ledger, &context.code_hash)? {
        Some(_) => Ok(()),
        None => Err(ContractError::ContractNotDeployed {
            code_hash: context.code_hash.to_string(),
        }),
    }
}

fn check_writable(engine: &ExecutionEngine, context: &StorageContext) -> ContractResult<()> {
    if engine.trigger() != TriggerType::Application {
        return Err(ContractError::WriteInVerification);
    }
    if context.is_read_only {
        return Err(ContractError::ReadOnlyContext {
            code_hash: context.code_hash.to_string(),
        });
    }
    Ok(())
}

fn storage_key(context: &StorageContext, key: Vec<u8>) -> ContractResult<Vec<u8>> {
    if key.len() > MAX_STORAGE_KEY_SIZE {
        return Err(ContractError::invalid_argument(
            "storage key",
            format!("{} bytes exceeds the limit of {MAX_STORAGE_KEY_SIZE}", key.len()),
        ));
    }
    Ok(StorageKey::new(context.code_hash, key).to_array())
}

/// Missing keys read as empty bytes.
fn storage_get(ledger: &Ledger, engine: &mut ExecutionEngine) -> VmResult<()> {
    let context = pop_storage_context(engine)?;
    let key = pop_bytes(engine)?;
    check_storage_context(ledger, &context)?;

    let key = storage_key(&context, key)?;
    let value = ledger
        .cache
        .try_get(DataEntryPrefix::StStorage, &key)
        .map_err(ContractError::from)?
        .and_then(|value| value.as_storage().map(|item| item.value.clone()))
        .unwrap_or_default();
    engine.push(StackItem::from_bytes(value));
    Ok(())
}

fn storage_put(ledger: &Ledger, engine: &mut ExecutionEngine) -> VmResult<()> {
    let context = pop_storage_context(engine)?;
    let key = pop_bytes(engine)?;
    let value = pop_bytes(engine)?;
    check_writable(engine, &context)?;
    check_storage_context(ledger, &context)?;

    let key = storage_key(&context, key)?;
    trace!(code_hash = %context.code_hash, key = %hex::encode(&key), "storage put");
    ledger
        .cache
        .put(DataEntryPrefix::StStorage, &key, StorageItem::new(value).into());
    Ok(())
}

fn storage_delete(ledger: &Ledger, engine: &mut ExecutionEngine) -> VmResult<()> {
    let context = pop_storage_context(engine)?;
    let key = pop_bytes(engine)?;
    check_writable(engine, &context)?;
    check_storage_context(ledger, &context)?;

    let key = storage_key(&context, key)?;
    trace!(code_hash = %context.code_hash, key = %hex::encode(&key), "storage delete");
    ledger.cache.try_delete(DataEntryPrefix::StStorage, &key);
    Ok(())
}

/// Pushes an iterator over the context's entries whose raw key starts with
/// the popped prefix, in key order.
fn storage_find(ledger: &Ledger, engine: &mut ExecutionEngine) -> VmResult<()> {
    let context = pop_storage_context(engine)?;
    let prefix = pop_bytes(engine)?;
    check_storage_context(ledger, &context)?;

    let mut entries = Vec::new();
    let found = ledger
        .cache
        .find(DataEntryPrefix::StStorage, context.code_hash.as_bytes())
        .map_err(ContractError::from)?;
    for (raw_key, value) in found {
        let storage_key = StorageKey::from_array(&raw_key).map_err(ContractError::from)?;
        if !storage_key.key.starts_with(&prefix) {
            continue;
        }
        if let Some(item) = value.as_storage() {
            entries.push((storage_key.key, item.value.clone()));
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    engine.push(StackItem::from_interop(InteropInterface::iterator(StorageIterator::new(entries))));
    Ok(())
}
