//! Constant push instructions.

use num_bigint::BigInt;

use crate::error::VmResult;
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::{check_item_size, JumpTable};
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::PUSH0, push0);
    jump_table.register(OpCode::PUSHDATA1, push_data);
    jump_table.register(OpCode::PUSHDATA2, push_data);
    jump_table.register(OpCode::PUSHDATA4, push_data);
    jump_table.register(OpCode::PUSHM1, push_int);
    for op in OpCode::PUSH1.as_byte()..=OpCode::PUSH16.as_byte() {
        if let Some(op) = OpCode::from_byte(op) {
            jump_table.register(op, push_int);
        }
    }
}

fn push0(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    engine.push(StackItem::ByteArray(Vec::new()));
    Ok(())
}

fn push_data(engine: &mut ExecutionEngine, op: OpCode) -> VmResult<()> {
    let context = engine.context_mut()?;
    let length = match op {
        OpCode::PUSHDATA1 => usize::from(context.read_u8()?),
        OpCode::PUSHDATA2 => usize::from(context.read_u16()?),
        _ => context.read_u32()? as usize,
    };
    check_item_size(engine, length)?;
    let data = engine.context_mut()?.read_bytes(length)?;
    engine.push(StackItem::ByteArray(data));
    Ok(())
}

/// PUSHM1 and PUSH1..PUSH16 push their value relative to PUSH1 - 1.
fn push_int(engine: &mut ExecutionEngine, op: OpCode) -> VmResult<()> {
    let value = i16::from(op.as_byte()) - i16::from(OpCode::PUSH1.as_byte()) + 1;
    engine.push(StackItem::Integer(BigInt::from(value)));
    Ok(())
}
