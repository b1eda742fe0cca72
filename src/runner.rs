//! Detached script runs: an in-memory store and an empty chain.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use sidechain_config::VmSettings;
use sidechain_core::Transaction;
use sidechain_persistence::{MemoryStore, Store};
use sidechain_smart_contract::{ApplicationEngine, ContractResult, EmptyChain};
use sidechain_vm::StackItem;

/// Runs `script` as the invocation script of a fresh transaction.
pub fn run_script(script: &[u8], settings: &VmSettings) -> ContractResult<ApplicationEngine> {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let container = Rc::new(Transaction::invoke(script.to_vec()));
    ApplicationEngine::run(script, Some(container), Rc::new(EmptyChain), store, settings)
}

/// One-line rendering of a stack item. Compound items show their size only.
pub fn describe(item: &StackItem) -> String {
    match item {
        StackItem::Boolean(value) => value.to_string(),
        StackItem::Integer(value) => value.to_string(),
        StackItem::ByteArray(bytes) => format!("0x{}", hex::encode(bytes)),
        StackItem::Array(items) => format!("Array[{}]", items.borrow().len()),
        StackItem::Struct(items) => format!("Struct[{}]", items.borrow().len()),
        StackItem::Map(map) => format!("Map{{{}}}", map.borrow().len()),
        StackItem::Interop(interop) => format!("Interop<{}>", interop.kind()),
    }
}

/// Final state, gas, fault and evaluation stack of a finished run.
pub fn report(engine: &ApplicationEngine) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    write_report(&mut out, engine).map(|()| out).unwrap_or_default()
}

fn write_report(out: &mut impl fmt::Write, engine: &ApplicationEngine) -> fmt::Result {
    writeln!(out, "state: {:?}", engine.state())?;
    writeln!(out, "gas consumed: {}", engine.gas_consumed())?;
    if let Some(reason) = engine.engine().fault_reason() {
        writeln!(out, "fault reason: {reason:?}")?;
    }
    if let Some(error) = engine.engine().fault_error() {
        writeln!(out, "fault: {error}")?;
    }
    let stack = engine.result_stack();
    writeln!(out, "stack ({} items, top first):", stack.len())?;
    for (index, item) in stack.iter().enumerate() {
        writeln!(out, "  {index}: {}", describe(item))?;
    }
    for event in engine.notifications() {
        writeln!(out, "notify {}: {}", event.script_hash, describe(&event.state))?;
    }
    for event in engine.logs() {
        writeln!(out, "log {}: {}", event.script_hash, event.message)?;
    }
    Ok(())
}
