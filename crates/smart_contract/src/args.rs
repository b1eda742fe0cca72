//! Typed pops for syscall arguments.
//!
//! Every host object comes back as a checked variant; a handle of the wrong
//! kind faults with a type mismatch instead of being downcast blindly.

use std::rc::Rc;

use num_traits::ToPrimitive;
use sidechain_core::{
    AccountState, AssetState, Attribute, Block, ContractState, Header, Input, Output,
    StorageContext, Transaction, UInt168, UInt256,
};
use sidechain_vm::{ExecutionEngine, InteropInterface, StackItem, VmError, VmResult};

use crate::error::{ContractError, ContractResult};
use crate::iterators::SharedIterator;

pub(crate) fn pop_interop(engine: &mut ExecutionEngine) -> VmResult<InteropInterface> {
    match engine.pop()? {
        StackItem::Interop(interop) => Ok(interop),
        other => Err(VmError::invalid_type("InteropInterface", other.type_name())),
    }
}

pub(crate) fn pop_bytes(engine: &mut ExecutionEngine) -> VmResult<Vec<u8>> {
    engine.evaluation_stack_mut().pop_bytes()
}

pub(crate) fn pop_i64(engine: &mut ExecutionEngine, what: &'static str) -> VmResult<i64> {
    let value = engine.evaluation_stack_mut().pop_int()?;
    value
        .to_i64()
        .ok_or_else(|| ContractError::invalid_argument(what, format!("{value} is out of range")).into())
}

pub(crate) fn pop_u32(engine: &mut ExecutionEngine, what: &'static str) -> VmResult<u32> {
    let value = engine.evaluation_stack_mut().pop_int()?;
    value
        .to_u32()
        .ok_or_else(|| ContractError::invalid_argument(what, format!("{value} is out of range")).into())
}

pub(crate) fn pop_u8(engine: &mut ExecutionEngine, what: &'static str) -> VmResult<u8> {
    let value = engine.evaluation_stack_mut().pop_int()?;
    value
        .to_u8()
        .ok_or_else(|| ContractError::invalid_argument(what, format!("{value} is out of range")).into())
}

pub(crate) fn pop_uint168(engine: &mut ExecutionEngine) -> VmResult<UInt168> {
    let bytes = pop_bytes(engine)?;
    Ok(UInt168::from_bytes(&bytes).map_err(ContractError::from)?)
}

pub(crate) fn pop_uint256(engine: &mut ExecutionEngine) -> VmResult<UInt256> {
    let bytes = pop_bytes(engine)?;
    Ok(UInt256::from_bytes(&bytes).map_err(ContractError::from)?)
}

/// A header, or the header of a block.
pub(crate) fn pop_header(engine: &mut ExecutionEngine) -> VmResult<Header> {
    match pop_interop(engine)? {
        InteropInterface::Header(header) => Ok(Header::clone(&header)),
        InteropInterface::Block(block) => Ok(block.header.clone()),
        other => Err(VmError::invalid_type("Header", other.kind())),
    }
}

pub(crate) fn pop_iterator(engine: &mut ExecutionEngine) -> VmResult<SharedIterator> {
    match pop_interop(engine)? {
        InteropInterface::Iterator(iterator) => Ok(iterator),
        other => Err(VmError::invalid_type("Iterator", other.kind())),
    }
}

macro_rules! pop_handle {
    ($($name:ident => $variant:ident($ty:ty)),* $(,)?) => {
        $(
            pub(crate) fn $name(engine: &mut ExecutionEngine) -> VmResult<Rc<$ty>> {
                match pop_interop(engine)? {
                    InteropInterface::$variant(value) => Ok(value),
                    other => Err(VmError::invalid_type(stringify!($variant), other.kind())),
                }
            }
        )*
    };
}

pop_handle! {
    pop_block => Block(Block),
    pop_transaction => Transaction(Transaction),
    pop_attribute => Attribute(Attribute),
    pop_input => Input(Input),
    pop_output => Output(Output),
    pop_account => Account(AccountState),
    pop_asset => Asset(AssetState),
    pop_contract => Contract(ContractState),
    pop_storage_context => StorageContext(StorageContext),
}

/// Pushes an array, enforcing the engine's array size limit.
pub(crate) fn push_array(engine: &mut ExecutionEngine, items: Vec<StackItem>) -> VmResult<()> {
    let limit = engine.limits().max_array_size;
    if items.len() > limit {
        return Err(VmError::ItemTooLarge {
            size: items.len(),
            limit,
        });
    }
    engine.push(StackItem::new_array(items));
    Ok(())
}

/// Pushes an array of host handles.
pub(crate) fn push_handles<T, I>(engine: &mut ExecutionEngine, items: I) -> VmResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<InteropInterface>,
{
    push_array(engine, items.into_iter().map(StackItem::from_interop).collect())
}

pub(crate) fn container(engine: &ExecutionEngine) -> ContractResult<Rc<Transaction>> {
    engine.script_container().cloned().ok_or(ContractError::NoContainer)
}

pub(crate) fn executing_hash(engine: &ExecutionEngine) -> ContractResult<UInt168> {
    engine
        .executing_script_hash()
        .ok_or(ContractError::NoExecutingScript)
}
