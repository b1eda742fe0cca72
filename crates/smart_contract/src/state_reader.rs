//! Read-only syscalls.
//!
//! Runtime services, chain queries and the accessors for every host object
//! a script can hold. Handlers that need the ledger close over the
//! [`Blockchain`] given to [`StateReader::new`].

use std::rc::Rc;

use sidechain_config::HASH_SIZE;
use sidechain_core::{AccountState, Header, StorageContext, UInt256};
use sidechain_vm::stack_item::serialization;
use sidechain_vm::{ExecutionEngine, InteropDescriptor, InteropInterface, InteropService, StackItem, VmResult};
use tracing::{debug, info};

use crate::args::{
    container, executing_hash, pop_account, pop_asset, pop_attribute, pop_block, pop_bytes,
    pop_contract, pop_header, pop_input, pop_iterator, pop_output, pop_storage_context,
    pop_transaction, pop_u32, pop_uint168, pop_uint256, push_array, push_handles,
};
use crate::blockchain::Blockchain;
use crate::error::{ContractError, ContractResult};
use crate::events::{EventRecorder, LogEvent, NotifyEvent};
use crate::iterators::{KeysIterator, ValuesIterator};
use crate::witness::{check_witness, witness_target};

/// Gas debited for accessors and runtime queries.
pub const DEFAULT_PRICE: i64 = 1;
/// Gas debited for calls that read the ledger.
pub const QUERY_PRICE: i64 = 100;
/// Gas debited for calls that resolve transaction references.
pub const REFERENCE_PRICE: i64 = 200;

type Handler = fn(&mut ExecutionEngine) -> VmResult<()>;
type ChainHandler = fn(&dyn Blockchain, &mut ExecutionEngine) -> VmResult<()>;

const HANDLERS: &[(&str, i64, Handler)] = &[
    ("Neo.Runtime.GetTrigger", DEFAULT_PRICE, runtime_get_trigger),
    ("Neo.Runtime.Serialize", DEFAULT_PRICE, runtime_serialize),
    ("Neo.Runtime.Deserialize", DEFAULT_PRICE, runtime_deserialize),
    ("Neo.Blockchain.GetValidators", DEFAULT_PRICE, blockchain_get_validators),
    ("Neo.Header.GetIndex", DEFAULT_PRICE, header_get_index),
    ("Neo.Header.GetHash", DEFAULT_PRICE, header_get_hash),
    ("Neo.Header.GetVersion", DEFAULT_PRICE, header_get_version),
    ("Neo.Header.GetPrevHash", DEFAULT_PRICE, header_get_prev_hash),
    ("Neo.Header.GetMerkleRoot", DEFAULT_PRICE, header_get_merkle_root),
    ("Neo.Header.GetTimestamp", DEFAULT_PRICE, header_get_timestamp),
    ("Neo.Header.GetConsensusData", DEFAULT_PRICE, header_get_consensus_data),
    ("Neo.Header.GetNextConsensus", DEFAULT_PRICE, header_get_next_consensus),
    ("Neo.Block.GetTransactionCount", DEFAULT_PRICE, block_get_transaction_count),
    ("Neo.Block.GetTransactions", DEFAULT_PRICE, block_get_transactions),
    ("Neo.Block.GetTransaction", DEFAULT_PRICE, block_get_transaction),
    ("Neo.Transaction.GetHash", DEFAULT_PRICE, transaction_get_hash),
    ("Neo.Transaction.GetType", DEFAULT_PRICE, transaction_get_type),
    ("Neo.Transaction.GetAttributes", DEFAULT_PRICE, transaction_get_attributes),
    ("Neo.Transaction.GetInputs", DEFAULT_PRICE, transaction_get_inputs),
    ("Neo.Transaction.GetOutputs", DEFAULT_PRICE, transaction_get_outputs),
    ("Neo.InvocationTransaction.GetScript", DEFAULT_PRICE, invocation_transaction_get_script),
    ("Neo.Attribute.GetUsage", DEFAULT_PRICE, attribute_get_usage),
    ("Neo.Attribute.GetData", DEFAULT_PRICE, attribute_get_data),
    ("Neo.Input.GetHash", DEFAULT_PRICE, input_get_hash),
    ("Neo.Input.GetIndex", DEFAULT_PRICE, input_get_index),
    ("Neo.Output.GetAssetId", DEFAULT_PRICE, output_get_asset_id),
    ("Neo.Output.GetValue", DEFAULT_PRICE, output_get_value),
    ("Neo.Output.GetScriptHash", DEFAULT_PRICE, output_get_script_hash),
    ("Neo.Account.GetScriptHash", DEFAULT_PRICE, account_get_script_hash),
    ("Neo.Account.GetBalance", DEFAULT_PRICE, account_get_balance),
    ("Neo.Account.GetVotes", DEFAULT_PRICE, account_get_votes),
    ("Neo.Asset.GetAssetId", DEFAULT_PRICE, asset_get_asset_id),
    ("Neo.Asset.GetAssetType", DEFAULT_PRICE, asset_get_asset_type),
    ("Neo.Asset.GetAmount", DEFAULT_PRICE, asset_get_amount),
    ("Neo.Asset.GetAvailable", DEFAULT_PRICE, asset_get_available),
    ("Neo.Asset.GetPrecision", DEFAULT_PRICE, asset_get_precision),
    ("Neo.Asset.GetOwner", DEFAULT_PRICE, asset_get_owner),
    ("Neo.Asset.GetAdmin", DEFAULT_PRICE, asset_get_admin),
    ("Neo.Asset.GetIssuer", DEFAULT_PRICE, asset_get_issuer),
    ("Neo.Contract.GetScript", DEFAULT_PRICE, contract_get_script),
    ("Neo.Contract.IsPayable", DEFAULT_PRICE, contract_is_payable),
    ("Neo.Storage.GetContext", DEFAULT_PRICE, storage_get_context),
    ("Neo.Storage.GetReadOnlyContext", DEFAULT_PRICE, storage_get_read_only_context),
    ("Neo.StorageContext.AsReadOnly", DEFAULT_PRICE, storage_context_as_read_only),
    ("Neo.Iterator.Next", DEFAULT_PRICE, iterator_next),
    ("Neo.Iterator.Key", DEFAULT_PRICE, iterator_key),
    ("Neo.Iterator.Value", DEFAULT_PRICE, iterator_value),
    ("Neo.Iterator.Keys", DEFAULT_PRICE, iterator_keys),
    ("Neo.Iterator.Values", DEFAULT_PRICE, iterator_values),
];

const CHAIN_HANDLERS: &[(&str, i64, ChainHandler)] = &[
    ("Neo.Runtime.CheckWitness", REFERENCE_PRICE, runtime_check_witness),
    ("Neo.Runtime.GetTime", DEFAULT_PRICE, runtime_get_time),
    ("Neo.Blockchain.GetHeight", DEFAULT_PRICE, blockchain_get_height),
    ("Neo.Blockchain.GetHeader", QUERY_PRICE, blockchain_get_header),
    ("Neo.Blockchain.GetBlock", QUERY_PRICE, blockchain_get_block),
    ("Neo.Blockchain.GetTransaction", QUERY_PRICE, blockchain_get_transaction),
    ("Neo.Blockchain.GetTransactionHeight", QUERY_PRICE, blockchain_get_transaction_height),
    ("Neo.Blockchain.GetAccount", QUERY_PRICE, blockchain_get_account),
    ("Neo.Blockchain.GetAsset", QUERY_PRICE, blockchain_get_asset),
    ("Neo.Transaction.GetReferences", REFERENCE_PRICE, transaction_get_references),
    ("Neo.Transaction.GetUnspentCoins", REFERENCE_PRICE, transaction_get_unspent_coins),
];

/// The read-only syscall surface.
pub struct StateReader {
    chain: Rc<dyn Blockchain>,
    events: EventRecorder,
}

impl StateReader {
    pub fn new(chain: Rc<dyn Blockchain>) -> Self {
        Self {
            chain,
            events: EventRecorder::new(),
        }
    }

    pub fn chain(&self) -> &Rc<dyn Blockchain> {
        &self.chain
    }

    /// Notifications and log lines raised by scripts run against this
    /// reader's handlers.
    pub fn events(&self) -> &EventRecorder {
        &self.events
    }

    /// A registry holding every read-only syscall.
    pub fn service(&self) -> InteropService {
        let mut service = InteropService::new();
        self.register_into(&mut service);
        service
    }

    /// Registers every read-only syscall whose name is still free.
    pub fn register_into(&self, service: &mut InteropService) {
        for &(name, price, handler) in HANDLERS {
            service.register(InteropDescriptor::new(name, price, handler));
        }
        for &(name, price, handler) in CHAIN_HANDLERS {
            let chain = Rc::clone(&self.chain);
            service.register(InteropDescriptor::new(name, price, move |engine| {
                handler(chain.as_ref(), engine)
            }));
        }

        let events = self.events.clone();
        service.register(InteropDescriptor::new("Neo.Runtime.Notify", DEFAULT_PRICE, move |engine| {
            runtime_notify(&events, engine)
        }));
        let events = self.events.clone();
        service.register(InteropDescriptor::new("Neo.Runtime.Log", DEFAULT_PRICE, move |engine| {
            runtime_log(&events, engine)
        }));
    }
}

/// Hash of the block a `GetHeader`/`GetBlock` operand names: up to five
/// little-endian bytes are a height, 32 bytes a hash.
fn locate_block(chain: &dyn Blockchain, data: &[u8]) -> ContractResult<UInt256> {
    match data.len() {
        0..=5 => {
            let height = data
                .iter()
                .rev()
                .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
            let height = u32::try_from(height).map_err(|_| {
                ContractError::invalid_argument("height", format!("{height} is out of range"))
            })?;
            chain
                .block_hash(height)
                .ok_or_else(|| ContractError::not_found("block at height", height))
        }
        HASH_SIZE => Ok(UInt256::from_bytes(data)?),
        other => Err(ContractError::invalid_argument(
            "block locator",
            format!("unsupported length {other}"),
        )),
    }
}

pub(crate) fn header_at(chain: &dyn Blockchain, height: u32) -> ContractResult<Header> {
    let hash = chain
        .block_hash(height)
        .ok_or_else(|| ContractError::not_found("block at height", height))?;
    chain
        .header(&hash)
        .ok_or_else(|| ContractError::not_found("header", hash))
}

// Runtime

fn runtime_get_trigger(engine: &mut ExecutionEngine) -> VmResult<()> {
    let trigger = engine.trigger() as u8;
    engine.push(StackItem::from_int(trigger));
    Ok(())
}

fn runtime_check_witness(chain: &dyn Blockchain, engine: &mut ExecutionEngine) -> VmResult<()> {
    let data = pop_bytes(engine)?;
    let target = witness_target(&data)?;
    let tx = container(engine)?;
    let result = check_witness(chain, &tx, &target)?;
    engine.push(StackItem::from_bool(result));
    Ok(())
}

fn runtime_notify(events: &EventRecorder, engine: &mut ExecutionEngine) -> VmResult<()> {
    let state = engine.pop()?;
    let script_hash = executing_hash(engine)?;
    debug!(%script_hash, ?state, "runtime notify");
    events.notify(NotifyEvent { script_hash, state });
    Ok(())
}

fn runtime_log(events: &EventRecorder, engine: &mut ExecutionEngine) -> VmResult<()> {
    let message = String::from_utf8_lossy(&pop_bytes(engine)?).into_owned();
    let script_hash = executing_hash(engine)?;
    info!(%script_hash, %message, "runtime log");
    events.log(LogEvent {
        script_hash,
        message,
    });
    Ok(())
}

fn runtime_get_time(chain: &dyn Blockchain, engine: &mut ExecutionEngine) -> VmResult<()> {
    let header = header_at(chain, chain.height())?;
    engine.push(StackItem::from(header.timestamp));
    Ok(())
}

fn runtime_serialize(engine: &mut ExecutionEngine) -> VmResult<()> {
    let item = engine.pop()?;
    let data = serialization::serialize(&item, engine.limits())?;
    engine.push(StackItem::from_bytes(data));
    Ok(())
}

fn runtime_deserialize(engine: &mut ExecutionEngine) -> VmResult<()> {
    let data = pop_bytes(engine)?;
    let item = serialization::deserialize(&data, engine.limits())?;
    engine.push(item);
    Ok(())
}

// Blockchain

fn blockchain_get_height(chain: &dyn Blockchain, engine: &mut ExecutionEngine) -> VmResult<()> {
    engine.push(StackItem::from(chain.height()));
    Ok(())
}

fn blockchain_get_header(chain: &dyn Blockchain, engine: &mut ExecutionEngine) -> VmResult<()> {
    let data = pop_bytes(engine)?;
    let hash = locate_block(chain, &data)?;
    let header = chain
        .header(&hash)
        .ok_or_else(|| ContractError::not_found("header", hash))?;
    engine.push(StackItem::from_interop(header));
    Ok(())
}

fn blockchain_get_block(chain: &dyn Blockchain, engine: &mut ExecutionEngine) -> VmResult<()> {
    let data = pop_bytes(engine)?;
    let hash = locate_block(chain, &data)?;
    let block = chain
        .block(&hash)
        .ok_or_else(|| ContractError::not_found("block", hash))?;
    engine.push(StackItem::from_interop(block));
    Ok(())
}

fn blockchain_get_transaction(chain: &dyn Blockchain, engine: &mut ExecutionEngine) -> VmResult<()> {
    let hash = pop_uint256(engine)?;
    let (tx, _) = chain
        .transaction(&hash)
        .ok_or_else(|| ContractError::not_found("transaction", hash))?;
    engine.push(StackItem::from_interop(tx));
    Ok(())
}

fn blockchain_get_transaction_height(
    chain: &dyn Blockchain,
    engine: &mut ExecutionEngine,
) -> VmResult<()> {
    let hash = pop_uint256(engine)?;
    let (_, height) = chain
        .transaction(&hash)
        .ok_or_else(|| ContractError::not_found("transaction", hash))?;
    engine.push(StackItem::from(height));
    Ok(())
}

/// Unknown accounts read as empty ones.
fn blockchain_get_account(chain: &dyn Blockchain, engine: &mut ExecutionEngine) -> VmResult<()> {
    let program_hash = pop_uint168(engine)?;
    let account = chain
        .account(&program_hash)
        .unwrap_or_else(|| AccountState::new(program_hash));
    engine.push(StackItem::from_interop(account));
    Ok(())
}

// The sidechain is mined, so there is no validator set.
fn blockchain_get_validators(engine: &mut ExecutionEngine) -> VmResult<()> {
    push_array(engine, Vec::new())
}

fn blockchain_get_asset(chain: &dyn Blockchain, engine: &mut ExecutionEngine) -> VmResult<()> {
    let asset_id = pop_uint256(engine)?;
    let asset = chain
        .asset(&asset_id)
        .ok_or_else(|| ContractError::not_found("asset", asset_id))?;
    engine.push(StackItem::from_interop(asset));
    Ok(())
}

// Header

fn header_get_index(engine: &mut ExecutionEngine) -> VmResult<()> {
    let header = pop_header(engine)?;
    engine.push(StackItem::from(header.height));
    Ok(())
}

fn header_get_hash(engine: &mut ExecutionEngine) -> VmResult<()> {
    let header = pop_header(engine)?;
    engine.push(StackItem::from_bytes(header.hash().to_vec()));
    Ok(())
}

fn header_get_version(engine: &mut ExecutionEngine) -> VmResult<()> {
    let header = pop_header(engine)?;
    engine.push(StackItem::from(header.version));
    Ok(())
}

fn header_get_prev_hash(engine: &mut ExecutionEngine) -> VmResult<()> {
    let header = pop_header(engine)?;
    engine.push(StackItem::from_bytes(header.previous.to_vec()));
    Ok(())
}

fn header_get_merkle_root(engine: &mut ExecutionEngine) -> VmResult<()> {
    let header = pop_header(engine)?;
    engine.push(StackItem::from_bytes(header.merkle_root.to_vec()));
    Ok(())
}

fn header_get_timestamp(engine: &mut ExecutionEngine) -> VmResult<()> {
    let header = pop_header(engine)?;
    engine.push(StackItem::from(header.timestamp));
    Ok(())
}

fn header_get_consensus_data(engine: &mut ExecutionEngine) -> VmResult<()> {
    let header = pop_header(engine)?;
    engine.push(StackItem::from(header.nonce));
    Ok(())
}

// No next consensus either; always zero.
fn header_get_next_consensus(engine: &mut ExecutionEngine) -> VmResult<()> {
    pop_header(engine)?;
    engine.push(StackItem::from_int(0));
    Ok(())
}

// Block

fn block_get_transaction_count(engine: &mut ExecutionEngine) -> VmResult<()> {
    let block = pop_block(engine)?;
    engine.push(StackItem::from_int(block.transactions.len()));
    Ok(())
}

fn block_get_transactions(engine: &mut ExecutionEngine) -> VmResult<()> {
    let block = pop_block(engine)?;
    push_handles(engine, block.transactions.iter().cloned())
}

fn block_get_transaction(engine: &mut ExecutionEngine) -> VmResult<()> {
    let block = pop_block(engine)?;
    let index = pop_u32(engine, "transaction index")?;
    let tx = block
        .transactions
        .get(index as usize)
        .cloned()
        .ok_or_else(|| ContractError::not_found("transaction at index", index))?;
    engine.push(StackItem::from_interop(tx));
    Ok(())
}

// Transaction

fn transaction_get_hash(engine: &mut ExecutionEngine) -> VmResult<()> {
    let tx = pop_transaction(engine)?;
    engine.push(StackItem::from_bytes(tx.hash().to_vec()));
    Ok(())
}

fn transaction_get_type(engine: &mut ExecutionEngine) -> VmResult<()> {
    let tx = pop_transaction(engine)?;
    engine.push(StackItem::from_int(tx.tx_type as u8));
    Ok(())
}

fn transaction_get_attributes(engine: &mut ExecutionEngine) -> VmResult<()> {
    let tx = pop_transaction(engine)?;
    push_handles(engine, tx.attributes.iter().cloned())
}

fn transaction_get_inputs(engine: &mut ExecutionEngine) -> VmResult<()> {
    let tx = pop_transaction(engine)?;
    push_handles(engine, tx.inputs.iter().copied())
}

fn transaction_get_outputs(engine: &mut ExecutionEngine) -> VmResult<()> {
    let tx = pop_transaction(engine)?;
    push_handles(engine, tx.outputs.iter().cloned())
}

fn transaction_get_references(chain: &dyn Blockchain, engine: &mut ExecutionEngine) -> VmResult<()> {
    let tx = pop_transaction(engine)?;
    let references = chain.tx_references(&tx)?;
    push_handles(engine, references)
}

fn transaction_get_unspent_coins(
    chain: &dyn Blockchain,
    engine: &mut ExecutionEngine,
) -> VmResult<()> {
    let tx = pop_transaction(engine)?;
    let hash = tx.hash();
    let unspents = chain
        .unspents(&hash)
        .ok_or_else(|| ContractError::not_found("transaction", hash))?;
    push_handles(engine, unspents)
}

fn invocation_transaction_get_script(engine: &mut ExecutionEngine) -> VmResult<()> {
    let tx = pop_transaction(engine)?;
    let code = tx.invoke_code().ok_or_else(|| {
        ContractError::invalid_argument("transaction", "not an invocation transaction")
    })?;
    engine.push(StackItem::from_bytes(code.to_vec()));
    Ok(())
}

// Attribute, Input, Output

fn attribute_get_usage(engine: &mut ExecutionEngine) -> VmResult<()> {
    let attribute = pop_attribute(engine)?;
    engine.push(StackItem::from_int(attribute.usage as u8));
    Ok(())
}

fn attribute_get_data(engine: &mut ExecutionEngine) -> VmResult<()> {
    let attribute = pop_attribute(engine)?;
    engine.push(StackItem::from_bytes(attribute.data.clone()));
    Ok(())
}

fn input_get_hash(engine: &mut ExecutionEngine) -> VmResult<()> {
    let input = pop_input(engine)?;
    engine.push(StackItem::from_bytes(input.previous.tx_id.to_vec()));
    Ok(())
}

fn input_get_index(engine: &mut ExecutionEngine) -> VmResult<()> {
    let input = pop_input(engine)?;
    engine.push(StackItem::from_int(input.previous.index));
    Ok(())
}

fn output_get_asset_id(engine: &mut ExecutionEngine) -> VmResult<()> {
    let output = pop_output(engine)?;
    engine.push(StackItem::from_bytes(output.asset_id.to_vec()));
    Ok(())
}

fn output_get_value(engine: &mut ExecutionEngine) -> VmResult<()> {
    let output = pop_output(engine)?;
    engine.push(StackItem::from(output.value.units()));
    Ok(())
}

fn output_get_script_hash(engine: &mut ExecutionEngine) -> VmResult<()> {
    let output = pop_output(engine)?;
    engine.push(StackItem::from_bytes(output.program_hash.to_vec()));
    Ok(())
}

// Account

fn account_get_script_hash(engine: &mut ExecutionEngine) -> VmResult<()> {
    let account = pop_account(engine)?;
    engine.push(StackItem::from_bytes(account.program_hash.to_vec()));
    Ok(())
}

fn account_get_balance(engine: &mut ExecutionEngine) -> VmResult<()> {
    let account = pop_account(engine)?;
    let asset_id = pop_uint256(engine)?;
    engine.push(StackItem::from(account.balance(&asset_id).units()));
    Ok(())
}

fn account_get_votes(engine: &mut ExecutionEngine) -> VmResult<()> {
    pop_account(engine)?;
    push_array(engine, Vec::new())
}

// Asset

fn asset_get_asset_id(engine: &mut ExecutionEngine) -> VmResult<()> {
    let asset = pop_asset(engine)?;
    engine.push(StackItem::from_bytes(asset.asset_id.to_vec()));
    Ok(())
}

fn asset_get_asset_type(engine: &mut ExecutionEngine) -> VmResult<()> {
    let asset = pop_asset(engine)?;
    engine.push(StackItem::from_int(asset.asset_type as u8));
    Ok(())
}

fn asset_get_amount(engine: &mut ExecutionEngine) -> VmResult<()> {
    let asset = pop_asset(engine)?;
    engine.push(StackItem::from(asset.amount.units()));
    Ok(())
}

fn asset_get_available(engine: &mut ExecutionEngine) -> VmResult<()> {
    let asset = pop_asset(engine)?;
    engine.push(StackItem::from(asset.available.units()));
    Ok(())
}

fn asset_get_precision(engine: &mut ExecutionEngine) -> VmResult<()> {
    let asset = pop_asset(engine)?;
    engine.push(StackItem::from_int(asset.precision));
    Ok(())
}

fn asset_get_owner(engine: &mut ExecutionEngine) -> VmResult<()> {
    let asset = pop_asset(engine)?;
    engine.push(StackItem::from_bytes(asset.owner.clone()));
    Ok(())
}

fn asset_get_admin(engine: &mut ExecutionEngine) -> VmResult<()> {
    let asset = pop_asset(engine)?;
    engine.push(StackItem::from_bytes(asset.admin.to_vec()));
    Ok(())
}

fn asset_get_issuer(engine: &mut ExecutionEngine) -> VmResult<()> {
    let asset = pop_asset(engine)?;
    engine.push(StackItem::from_bytes(asset.issuer.to_vec()));
    Ok(())
}

// Contract

fn contract_get_script(engine: &mut ExecutionEngine) -> VmResult<()> {
    let contract = pop_contract(engine)?;
    engine.push(StackItem::from_bytes(contract.script().to_vec()));
    Ok(())
}

fn contract_is_payable(engine: &mut ExecutionEngine) -> VmResult<()> {
    pop_contract(engine)?;
    engine.push(StackItem::from_bool(true));
    Ok(())
}

// Storage contexts

fn storage_get_context(engine: &mut ExecutionEngine) -> VmResult<()> {
    let code_hash = executing_hash(engine)?;
    engine.push(StackItem::from_interop(StorageContext::new(code_hash)));
    Ok(())
}

fn storage_get_read_only_context(engine: &mut ExecutionEngine) -> VmResult<()> {
    let code_hash = executing_hash(engine)?;
    engine.push(StackItem::from_interop(StorageContext::read_only(code_hash)));
    Ok(())
}

/// Always leaves a read-only context on the stack; a context that already
/// is one goes back unchanged.
fn storage_context_as_read_only(engine: &mut ExecutionEngine) -> VmResult<()> {
    let context = pop_storage_context(engine)?;
    if context.is_read_only {
        engine.push(StackItem::from_interop(context));
    } else {
        engine.push(StackItem::from_interop(context.as_read_only()));
    }
    Ok(())
}

// Iterators

fn iterator_next(engine: &mut ExecutionEngine) -> VmResult<()> {
    let iterator = pop_iterator(engine)?;
    let advanced = iterator.borrow_mut().next();
    engine.push(StackItem::from_bool(advanced));
    Ok(())
}

fn iterator_key(engine: &mut ExecutionEngine) -> VmResult<()> {
    let iterator = pop_iterator(engine)?;
    let key = iterator
        .borrow()
        .key()
        .ok_or_else(|| ContractError::invalid_argument("iterator", "no current entry"))?;
    engine.push(key);
    Ok(())
}

fn iterator_value(engine: &mut ExecutionEngine) -> VmResult<()> {
    let iterator = pop_iterator(engine)?;
    let value = iterator
        .borrow()
        .value()
        .ok_or_else(|| ContractError::invalid_argument("iterator", "no current entry"))?;
    engine.push(value);
    Ok(())
}

fn iterator_keys(engine: &mut ExecutionEngine) -> VmResult<()> {
    let iterator = pop_iterator(engine)?;
    engine.push(StackItem::from_interop(InteropInterface::iterator(KeysIterator::new(iterator))));
    Ok(())
}

fn iterator_values(engine: &mut ExecutionEngine) -> VmResult<()> {
    let iterator = pop_iterator(engine)?;
    engine.push(StackItem::from_interop(InteropInterface::iterator(ValuesIterator::new(
        iterator,
    ))));
    Ok(())
}
