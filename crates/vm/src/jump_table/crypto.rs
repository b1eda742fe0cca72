//! Hashing and signature checks.

use num_traits::ToPrimitive;

use crate::crypto::{sha1, sha256};
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::SHA1, digest);
    jump_table.register(OpCode::SHA256, digest);
    jump_table.register(OpCode::HASH160, digest);
    jump_table.register(OpCode::HASH256, digest);
    jump_table.register(OpCode::CHECKSIG, check_sig);
    jump_table.register(OpCode::CHECKMULTISIG, check_multisig);
}

fn digest(engine: &mut ExecutionEngine, op: OpCode) -> VmResult<()> {
    let x = engine.evaluation_stack_mut().pop_bytes()?;
    let hash = match op {
        OpCode::SHA1 => sha1(&x),
        OpCode::SHA256 => sha256(&x),
        OpCode::HASH160 => engine.crypto().hash160(&x),
        _ => engine.crypto().hash256(&x),
    };
    engine.push(StackItem::ByteArray(hash));
    Ok(())
}

/// The signed message is the container's unsigned serialization.
fn sign_message(engine: &ExecutionEngine) -> VmResult<Vec<u8>> {
    engine
        .script_container()
        .map(|tx| tx.sign_data())
        .ok_or_else(|| VmError::invalid_operation_msg("signature check without a script container"))
}

fn check_sig(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let public_key = engine.evaluation_stack_mut().pop_bytes()?;
    let signature = engine.evaluation_stack_mut().pop_bytes()?;
    let message = sign_message(engine)?;
    let valid = engine
        .crypto()
        .verify_signature(&message, &signature, &public_key);
    engine.push(StackItem::Boolean(valid));
    Ok(())
}

/// Pops either an array of byte strings or a count followed by that many
/// items.
fn pop_byte_list(engine: &mut ExecutionEngine, what: &str) -> VmResult<Vec<Vec<u8>>> {
    let item = engine.pop()?;
    if let Some(items) = item.array_ref() {
        return Ok(items.borrow().iter().map(StackItem::as_bytes).collect());
    }
    let count = item.as_int();
    let available = engine.evaluation_stack().len();
    let count = count
        .to_usize()
        .filter(|count| *count >= 1 && *count <= available)
        .ok_or_else(|| VmError::invalid_operation_msg(format!("invalid {what} count {count}")))?;
    (0..count)
        .map(|_| engine.evaluation_stack_mut().pop_bytes())
        .collect()
}

/// Verifies m signatures against n keys in order: each signature must match
/// a key later than the one matched by the previous signature.
fn check_multisig(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let public_keys = pop_byte_list(engine, "public key")?;
    let n = public_keys.len();
    if n == 0 || n > engine.limits().max_array_size {
        return Err(VmError::invalid_operation_msg(format!("invalid public key count {n}")));
    }
    let signatures = pop_byte_list(engine, "signature")?;
    let m = signatures.len();
    if m == 0 || m > n {
        return Err(VmError::invalid_operation_msg(format!(
            "invalid signature count {m} for {n} keys"
        )));
    }
    let message = sign_message(engine)?;

    let crypto = engine.crypto();
    let (mut i, mut j) = (0, 0);
    let mut success = true;
    while success && i < m && j < n {
        if crypto.verify_signature(&message, &signatures[i], &public_keys[j]) {
            i += 1;
        }
        j += 1;
        if m - i > n - j {
            success = false;
        }
    }
    engine.push(StackItem::Boolean(success));
    Ok(())
}
