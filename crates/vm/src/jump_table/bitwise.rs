//! Bitwise logic and value equality.

use crate::error::VmResult;
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::numeric::{pop_int, push_int};
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::INVERT, invert);
    jump_table.register(OpCode::AND, bitwise);
    jump_table.register(OpCode::OR, bitwise);
    jump_table.register(OpCode::XOR, bitwise);
    jump_table.register(OpCode::EQUAL, equal);
}

fn invert(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let x = pop_int(engine)?;
    push_int(engine, !x)
}

fn bitwise(engine: &mut ExecutionEngine, op: OpCode) -> VmResult<()> {
    let x2 = pop_int(engine)?;
    let x1 = pop_int(engine)?;
    let result = match op {
        OpCode::AND => x1 & x2,
        OpCode::OR => x1 | x2,
        _ => x1 ^ x2,
    };
    push_int(engine, result)
}

fn equal(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let x2 = engine.pop()?;
    let x1 = engine.pop()?;
    engine.push(StackItem::Boolean(x1.equals(&x2)));
    Ok(())
}
