//! Commit and rollback behaviour of the application engine.

mod common;

use std::rc::Rc;
use std::sync::Arc;

use common::*;
use sidechain_config::VmSettings;
use sidechain_core::{Transaction, UInt168};
use sidechain_persistence::{DBCache, DataCache, DataEntryPrefix, MemoryStore, Store};
use sidechain_smart_contract::state_machine::{STORAGE_READ_PRICE, STORAGE_WRITE_PRICE};
use sidechain_smart_contract::state_reader::DEFAULT_PRICE;
use sidechain_smart_contract::ApplicationEngine;
use sidechain_vm::{FaultReason, OpCode, ScriptBuilder, TriggerType, VMState};

/// Puts `k1 = v1` into its own storage, then reads it back.
fn writer_contract() -> Vec<u8> {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"v1")
        .emit_push(b"k1")
        .emit_syscall("Neo.Storage.GetContext")
        .emit_syscall("Neo.Storage.Put")
        .emit_push(b"k1")
        .emit_syscall("Neo.Storage.GetContext")
        .emit_syscall("Neo.Storage.Get")
        .emit_opcode(OpCode::RET);
    builder.to_array()
}

/// Puts `k2 = v2`, then throws.
fn throwing_contract() -> Vec<u8> {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"v2")
        .emit_push(b"k2")
        .emit_syscall("Neo.Storage.GetContext")
        .emit_syscall("Neo.Storage.Put")
        .emit_opcode(OpCode::THROW);
    builder.to_array()
}

fn fault_message(engine: &ApplicationEngine) -> String {
    engine
        .engine()
        .fault_error()
        .map(ToString::to_string)
        .unwrap_or_default()
}

#[test]
fn test_halt_merges_writes_into_parent() {
    let root = memory_cache();
    let code_hash = deploy(root.as_ref(), writer_contract());

    let engine = execute(FakeChain::with_blocks(1), root.clone(), app_call(&code_hash));

    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(engine.result_stack()[0].as_bytes(), b"v1".to_vec());
    assert_eq!(stored_value(root.as_ref(), code_hash, b"k1"), Some(b"v1".to_vec()));
    assert_eq!(
        engine.gas_consumed(),
        2 * DEFAULT_PRICE + STORAGE_WRITE_PRICE + STORAGE_READ_PRICE
    );

    // The parent still buffers; only its own commit reaches the store.
    let full_key = DataEntryPrefix::StStorage.full_key(&storage_key(code_hash, b"k1"));
    assert!(root.store().get(&full_key).unwrap().is_none());
    root.commit().unwrap();
    assert!(root.store().get(&full_key).unwrap().is_some());
}

#[test]
fn test_fault_discards_writes() {
    let root = memory_cache();
    let code_hash = deploy(root.as_ref(), throwing_contract());

    let engine = execute(FakeChain::with_blocks(1), root.clone(), app_call(&code_hash));

    assert_eq!(engine.state(), VMState::FAULT);
    assert_eq!(stored_value(root.as_ref(), code_hash, b"k2"), None);
    assert_eq!(stored_value(engine.cache().as_ref(), code_hash, b"k2"), None);
}

#[test]
fn test_reads_see_writes_of_the_same_execution() {
    let root = memory_cache();
    let code_hash = deploy(root.as_ref(), writer_contract());
    seed_storage(root.as_ref(), code_hash, b"k1", b"old");

    let engine = execute(FakeChain::with_blocks(1), root.clone(), app_call(&code_hash));

    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(engine.result_stack()[0].as_bytes(), b"v1".to_vec());
}

#[test]
fn test_read_only_context_rejects_put() {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"v")
        .emit_push(b"k")
        .emit_syscall("Neo.Storage.GetReadOnlyContext")
        .emit_syscall("Neo.Storage.Put");
    let root = memory_cache();
    let code_hash = deploy(root.as_ref(), builder.to_array());

    let engine = execute(FakeChain::with_blocks(1), root.clone(), app_call(&code_hash));

    assert_eq!(engine.state(), VMState::FAULT);
    assert_eq!(engine.engine().fault_reason(), Some(FaultReason::HostFunction));
    assert!(fault_message(&engine).contains("read-only"));
    assert_eq!(stored_value(root.as_ref(), code_hash, b"k"), None);
}

#[test]
fn test_as_read_only_downgrades_context() {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"v")
        .emit_push(b"k")
        .emit_syscall("Neo.Storage.GetContext")
        .emit_syscall("Neo.StorageContext.AsReadOnly")
        .emit_syscall("Neo.Storage.Put");
    let root = memory_cache();
    let code_hash = deploy(root.as_ref(), builder.to_array());

    let engine = execute(FakeChain::with_blocks(1), root, app_call(&code_hash));

    assert_eq!(engine.state(), VMState::FAULT);
    assert!(fault_message(&engine).contains("read-only"));
}

#[test]
fn test_storage_needs_deployed_contract() {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"v")
        .emit_push(b"k")
        .emit_syscall("Neo.Storage.GetContext")
        .emit_syscall("Neo.Storage.Put");

    let engine = execute(FakeChain::with_blocks(1), memory_cache(), builder.to_array());

    assert_eq!(engine.state(), VMState::FAULT);
    assert!(fault_message(&engine).contains("not deployed"));
}

#[test]
fn test_verification_trigger_reads_but_never_writes() {
    let mut reader = ScriptBuilder::new();
    reader
        .emit_push(b"k1")
        .emit_syscall("Neo.Storage.GetContext")
        .emit_syscall("Neo.Storage.Get")
        .emit_opcode(OpCode::RET);
    let root = memory_cache();
    let reader_hash = deploy(root.as_ref(), reader.to_array());
    let writer_hash = deploy(root.as_ref(), writer_contract());
    seed_storage(root.as_ref(), reader_hash, b"k1", b"seeded");

    let script = app_call(&reader_hash);
    let engine = execute_with(
        FakeChain::with_blocks(1),
        root.clone(),
        script.clone(),
        Transaction::invoke(script),
        TriggerType::Verification,
    );
    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(engine.result_stack()[0].as_bytes(), b"seeded".to_vec());

    let script = app_call(&writer_hash);
    let engine = execute_with(
        FakeChain::with_blocks(1),
        root.clone(),
        script.clone(),
        Transaction::invoke(script),
        TriggerType::Verification,
    );
    assert_eq!(engine.state(), VMState::FAULT);
    assert!(fault_message(&engine).contains("verification"));
    assert_eq!(stored_value(root.as_ref(), writer_hash, b"k1"), None);
}

#[test]
fn test_run_flushes_store_only_on_halt() {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let setup = DBCache::new(store.clone());
    let writer_hash = deploy(&setup, writer_contract());
    let thrower_hash = deploy(&setup, throwing_contract());
    setup.commit().unwrap();

    let settings = VmSettings::default();
    let script = app_call(&writer_hash);
    let engine = ApplicationEngine::run(
        &script,
        Some(Rc::new(Transaction::invoke(script.clone()))),
        Rc::new(FakeChain::with_blocks(1)),
        store.clone(),
        &settings,
    )
    .unwrap();
    assert_eq!(engine.state(), VMState::HALT);
    let written = DataEntryPrefix::StStorage.full_key(&storage_key(writer_hash, b"k1"));
    assert!(store.get(&written).unwrap().is_some());

    let script = app_call(&thrower_hash);
    let engine = ApplicationEngine::run(
        &script,
        Some(Rc::new(Transaction::invoke(script.clone()))),
        Rc::new(FakeChain::with_blocks(1)),
        store.clone(),
        &settings,
    )
    .unwrap();
    assert_eq!(engine.state(), VMState::FAULT);
    let discarded = DataEntryPrefix::StStorage.full_key(&storage_key(thrower_hash, b"k2"));
    assert!(store.get(&discarded).unwrap().is_none());
}

#[test]
fn test_app_call_to_unknown_contract_faults() {
    let unknown = UInt168::from_bytes(&[0x1C; 21]).unwrap();
    let engine = execute(FakeChain::with_blocks(1), memory_cache(), app_call(&unknown));

    assert_eq!(engine.state(), VMState::FAULT);
    assert_eq!(engine.engine().fault_reason(), Some(FaultReason::Structural));
}

#[test]
fn test_events_carry_the_emitting_contract() {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"hello")
        .emit_syscall("Neo.Runtime.Notify")
        .emit_push(b"line")
        .emit_syscall("Neo.Runtime.Log")
        .emit_opcode(OpCode::RET);
    let root = memory_cache();
    let code_hash = deploy(root.as_ref(), builder.to_array());

    let engine = execute(FakeChain::with_blocks(1), root, app_call(&code_hash));

    assert_eq!(engine.state(), VMState::HALT);
    let notifications = engine.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].script_hash, code_hash);
    assert_eq!(notifications[0].state.as_bytes(), b"hello".to_vec());
    let logs = engine.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].script_hash, code_hash);
    assert_eq!(logs[0].message, "line");
}

#[test]
fn test_gas_limit_stops_syscalls() {
    let root = memory_cache();
    let code_hash = deploy(root.as_ref(), writer_contract());
    let script = app_call(&code_hash);
    let settings = VmSettings {
        gas_limit: STORAGE_WRITE_PRICE,
        ..VmSettings::default()
    };

    let mut engine = ApplicationEngine::new(
        TriggerType::Application,
        Some(Rc::new(Transaction::invoke(script.clone()))),
        Rc::new(FakeChain::with_blocks(1)),
        root.clone(),
        &settings,
    );
    engine.load_script(script).unwrap();

    assert_eq!(engine.execute().unwrap(), VMState::FAULT);
    assert_eq!(engine.engine().fault_reason(), Some(FaultReason::ResourceExhausted));
    assert_eq!(engine.gas_consumed(), DEFAULT_PRICE);
    assert_eq!(stored_value(root.as_ref(), code_hash, b"k1"), None);
}

#[test]
fn test_handler_faults_keep_their_category() {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_syscall("Neo.Storage.GetContext")
        .emit_syscall("Neo.Header.GetHash");
    let engine = execute(FakeChain::with_blocks(1), memory_cache(), builder.to_array());
    assert_eq!(engine.state(), VMState::FAULT);
    assert_eq!(engine.engine().fault_reason(), Some(FaultReason::TypeMismatch));

    let mut builder = ScriptBuilder::new();
    builder.emit_syscall("Neo.Header.GetHash");
    let engine = execute(FakeChain::with_blocks(1), memory_cache(), builder.to_array());
    assert_eq!(engine.state(), VMState::FAULT);
    assert_eq!(engine.engine().fault_reason(), Some(FaultReason::Structural));
}
