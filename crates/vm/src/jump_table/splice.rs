//! Byte array slicing and concatenation.

use num_bigint::BigInt;

use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::{check_item_size, pop_index, JumpTable};
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::CAT, cat);
    jump_table.register(OpCode::SUBSTR, substr);
    jump_table.register(OpCode::LEFT, left);
    jump_table.register(OpCode::RIGHT, right);
    jump_table.register(OpCode::SIZE, size);
}

fn cat(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let x2 = engine.evaluation_stack_mut().pop_bytes()?;
    let mut x1 = engine.evaluation_stack_mut().pop_bytes()?;
    check_item_size(engine, x1.len() + x2.len())?;
    x1.extend_from_slice(&x2);
    engine.push(StackItem::ByteArray(x1));
    Ok(())
}

/// Out-of-range windows are clamped to the available bytes.
fn substr(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let count = pop_index(engine)?;
    let index = pop_index(engine)?;
    let x = engine.evaluation_stack_mut().pop_bytes()?;
    let start = index.min(x.len());
    let end = start.saturating_add(count).min(x.len());
    engine.push(StackItem::ByteArray(x[start..end].to_vec()));
    Ok(())
}

fn left(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let count = pop_index(engine)?;
    let x = engine.evaluation_stack_mut().pop_bytes()?;
    let end = count.min(x.len());
    engine.push(StackItem::ByteArray(x[..end].to_vec()));
    Ok(())
}

fn right(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let count = pop_index(engine)?;
    let x = engine.evaluation_stack_mut().pop_bytes()?;
    if count > x.len() {
        return Err(VmError::invalid_operation_msg(format!(
            "RIGHT of {count} bytes from a {}-byte array",
            x.len()
        )));
    }
    engine.push(StackItem::ByteArray(x[x.len() - count..].to_vec()));
    Ok(())
}

fn size(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let x = engine.evaluation_stack_mut().pop_bytes()?;
    engine.push(StackItem::Integer(BigInt::from(x.len())));
    Ok(())
}
