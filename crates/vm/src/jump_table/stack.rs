//! Stack manipulation between the evaluation and alt stacks.

use num_bigint::BigInt;

use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::{pop_index, JumpTable};
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::DUPFROMALTSTACK, dup_from_alt_stack);
    jump_table.register(OpCode::TOALTSTACK, to_alt_stack);
    jump_table.register(OpCode::FROMALTSTACK, from_alt_stack);
    jump_table.register(OpCode::XDROP, xdrop);
    jump_table.register(OpCode::XSWAP, xswap);
    jump_table.register(OpCode::XTUCK, xtuck);
    jump_table.register(OpCode::DEPTH, depth);
    jump_table.register(OpCode::DROP, drop);
    jump_table.register(OpCode::DUP, dup);
    jump_table.register(OpCode::NIP, nip);
    jump_table.register(OpCode::OVER, over);
    jump_table.register(OpCode::PICK, pick);
    jump_table.register(OpCode::ROLL, roll);
    jump_table.register(OpCode::ROT, rot);
    jump_table.register(OpCode::SWAP, swap);
    jump_table.register(OpCode::TUCK, tuck);
}

fn dup_from_alt_stack(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let item = engine.alt_stack().peek(0)?.clone();
    engine.push(item);
    Ok(())
}

fn to_alt_stack(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let item = engine.pop()?;
    engine.alt_stack_mut().push(item);
    Ok(())
}

fn from_alt_stack(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let item = engine.alt_stack_mut().pop()?;
    engine.push(item);
    Ok(())
}

fn xdrop(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let n = pop_index(engine)?;
    engine.evaluation_stack_mut().remove(n)?;
    Ok(())
}

fn xswap(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let n = pop_index(engine)?;
    if n == 0 {
        return Ok(());
    }
    engine.evaluation_stack_mut().swap(0, n)
}

fn xtuck(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let n = pop_index(engine)?;
    if n == 0 {
        return Err(VmError::invalid_operation_msg("XTUCK needs a positive depth"));
    }
    let top = engine.peek(0)?.clone();
    engine.evaluation_stack_mut().insert(n, top)
}

fn depth(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let depth = engine.evaluation_stack().len();
    engine.push(StackItem::Integer(BigInt::from(depth)));
    Ok(())
}

fn drop(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    engine.pop()?;
    Ok(())
}

fn dup(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let top = engine.peek(0)?.clone();
    engine.push(top);
    Ok(())
}

fn nip(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    engine.evaluation_stack_mut().remove(1)?;
    Ok(())
}

fn over(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let item = engine.peek(1)?.clone();
    engine.push(item);
    Ok(())
}

fn pick(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let n = pop_index(engine)?;
    let item = engine.peek(n)?.clone();
    engine.push(item);
    Ok(())
}

fn roll(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let n = pop_index(engine)?;
    if n == 0 {
        return Ok(());
    }
    let item = engine.evaluation_stack_mut().remove(n)?;
    engine.push(item);
    Ok(())
}

fn rot(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let item = engine.evaluation_stack_mut().remove(2)?;
    engine.push(item);
    Ok(())
}

fn swap(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    engine.evaluation_stack_mut().swap(0, 1)
}

fn tuck(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let top = engine.peek(0)?.clone();
    engine.evaluation_stack_mut().insert(2, top)
}
