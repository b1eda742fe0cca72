//! Numeric operations for the VM.
//!
//! Integer operands and results are bounded by `max_bigint_size` bytes in
//! their signed little-endian form.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;
use crate::stack_item::stack_item::int_to_bytes;
use crate::stack_item::StackItem;

/// Registers the numeric operation handlers.
pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::INC, unary);
    jump_table.register(OpCode::DEC, unary);
    jump_table.register(OpCode::SIGN, unary);
    jump_table.register(OpCode::NEGATE, unary);
    jump_table.register(OpCode::ABS, unary);
    jump_table.register(OpCode::NOT, not);
    jump_table.register(OpCode::NZ, nz);
    jump_table.register(OpCode::ADD, binary);
    jump_table.register(OpCode::SUB, binary);
    jump_table.register(OpCode::MUL, binary);
    jump_table.register(OpCode::DIV, binary);
    jump_table.register(OpCode::MOD, binary);
    jump_table.register(OpCode::SHL, shift);
    jump_table.register(OpCode::SHR, shift);
    jump_table.register(OpCode::BOOLAND, boolean);
    jump_table.register(OpCode::BOOLOR, boolean);
    jump_table.register(OpCode::NUMEQUAL, compare);
    jump_table.register(OpCode::NUMNOTEQUAL, compare);
    jump_table.register(OpCode::LT, compare);
    jump_table.register(OpCode::GT, compare);
    jump_table.register(OpCode::LTE, compare);
    jump_table.register(OpCode::GTE, compare);
    jump_table.register(OpCode::MIN, binary);
    jump_table.register(OpCode::MAX, binary);
    jump_table.register(OpCode::WITHIN, within);
}

fn check_size(engine: &ExecutionEngine, value: &BigInt) -> VmResult<()> {
    let size = int_to_bytes(value).len();
    let limit = engine.limits().max_bigint_size;
    if size > limit {
        return Err(VmError::ItemTooLarge { size, limit });
    }
    Ok(())
}

/// Pops an integer operand, rejecting oversized values.
pub(crate) fn pop_int(engine: &mut ExecutionEngine) -> VmResult<BigInt> {
    let value = engine.pop()?.as_int();
    check_size(engine, &value)?;
    Ok(value)
}

/// Pushes an integer result, rejecting oversized values.
pub(crate) fn push_int(engine: &mut ExecutionEngine, value: BigInt) -> VmResult<()> {
    check_size(engine, &value)?;
    engine.push(StackItem::Integer(value));
    Ok(())
}

fn unary(engine: &mut ExecutionEngine, op: OpCode) -> VmResult<()> {
    let x = pop_int(engine)?;
    let result = match op {
        OpCode::INC => x + 1,
        OpCode::DEC => x - 1,
        OpCode::SIGN => x.signum(),
        OpCode::NEGATE => -x,
        _ => x.abs(),
    };
    push_int(engine, result)
}

fn not(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let x = engine.evaluation_stack_mut().pop_bool()?;
    engine.push(StackItem::Boolean(!x));
    Ok(())
}

fn nz(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let x = pop_int(engine)?;
    engine.push(StackItem::Boolean(!x.is_zero()));
    Ok(())
}

fn binary(engine: &mut ExecutionEngine, op: OpCode) -> VmResult<()> {
    let x2 = pop_int(engine)?;
    let x1 = pop_int(engine)?;
    let result = match op {
        OpCode::ADD => x1 + x2,
        OpCode::SUB => x1 - x2,
        OpCode::MUL => x1 * x2,
        OpCode::DIV | OpCode::MOD if x2.is_zero() => {
            return Err(VmError::invalid_operation_msg("division by zero"));
        }
        OpCode::DIV => x1 / x2,
        OpCode::MOD => x1 % x2,
        OpCode::MIN => x1.min(x2),
        _ => x1.max(x2),
    };
    push_int(engine, result)
}

fn shift(engine: &mut ExecutionEngine, op: OpCode) -> VmResult<()> {
    let amount = pop_int(engine)?;
    let limit = engine.limits().max_shift;
    let amount = amount
        .to_usize()
        .filter(|amount| *amount <= limit)
        .ok_or_else(|| VmError::invalid_operation_msg(format!("shift {amount} out of range")))?;
    let x = pop_int(engine)?;
    let result = if op == OpCode::SHL { x << amount } else { x >> amount };
    push_int(engine, result)
}

fn boolean(engine: &mut ExecutionEngine, op: OpCode) -> VmResult<()> {
    let x2 = engine.evaluation_stack_mut().pop_bool()?;
    let x1 = engine.evaluation_stack_mut().pop_bool()?;
    let result = if op == OpCode::BOOLAND { x1 && x2 } else { x1 || x2 };
    engine.push(StackItem::Boolean(result));
    Ok(())
}

fn compare(engine: &mut ExecutionEngine, op: OpCode) -> VmResult<()> {
    let x2 = pop_int(engine)?;
    let x1 = pop_int(engine)?;
    let result = match op {
        OpCode::NUMEQUAL => x1 == x2,
        OpCode::NUMNOTEQUAL => x1 != x2,
        OpCode::LT => x1 < x2,
        OpCode::GT => x1 > x2,
        OpCode::LTE => x1 <= x2,
        _ => x1 >= x2,
    };
    engine.push(StackItem::Boolean(result));
    Ok(())
}

/// `a <= x < b`, popping b, a, x.
fn within(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let b = pop_int(engine)?;
    let a = pop_int(engine)?;
    let x = pop_int(engine)?;
    engine.push(StackItem::Boolean(a <= x && x < b));
    Ok(())
}
