//! Flow control: jumps, calls, returns, cross-contract calls and syscalls.

use std::rc::Rc;

use sidechain_config::{MAX_SYSCALL_NAME_SIZE, PROGRAM_HASH_SIZE};
use sidechain_core::UInt168;

use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;

/// Width of a jump instruction: opcode plus 16-bit offset.
const JUMP_WIDTH: i64 = 3;

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::NOP, nop);
    jump_table.register(OpCode::JMP, jmp);
    jump_table.register(OpCode::JMPIF, jmp);
    jump_table.register(OpCode::JMPIFNOT, jmp);
    jump_table.register(OpCode::CALL, call);
    jump_table.register(OpCode::RET, ret);
    jump_table.register(OpCode::APPCALL, app_call);
    jump_table.register(OpCode::TAILCALL, app_call);
    jump_table.register(OpCode::SYSCALL, syscall);
}

fn nop(_engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    Ok(())
}

/// Offsets are relative to the jump opcode itself. A target equal to the
/// script length is legal and returns from the context.
fn jmp(engine: &mut ExecutionEngine, op: OpCode) -> VmResult<()> {
    let context = engine.context_mut()?;
    let offset = i64::from(context.read_i16()?);
    let target = context.instruction_pointer() as i64 + offset - JUMP_WIDTH;
    let length = context.script().len();
    if target < 0 || target > length as i64 {
        return Err(VmError::InvalidJump { target, length });
    }

    let taken = match op {
        OpCode::JMPIF => engine.evaluation_stack_mut().pop_bool()?,
        OpCode::JMPIFNOT => !engine.evaluation_stack_mut().pop_bool()?,
        _ => true,
    };
    if taken {
        engine.context_mut()?.set_instruction_pointer(target as usize);
    }
    Ok(())
}

/// Pushes a copy of the current frame positioned at the call operand, moves
/// the caller past the operand, and jumps inside the copy.
fn call(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let context = engine.context_mut()?;
    let callee = context.clone();
    let return_position = context.instruction_pointer() + 2;
    context.set_instruction_pointer(return_position);
    engine.load_context(callee)?;
    jmp(engine, OpCode::JMP)
}

fn ret(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    engine.unload_context()?;
    Ok(())
}

fn app_call(engine: &mut ExecutionEngine, op: OpCode) -> VmResult<()> {
    let hash = engine.context_mut()?.read_bytes(PROGRAM_HASH_SIZE)?;
    let code_hash = UInt168::from_bytes(&hash).map_err(VmError::host)?;
    let script = engine
        .script_table()
        .and_then(|table| table.get_script(&code_hash))
        .ok_or_else(|| VmError::ScriptNotFound {
            hash: code_hash.to_string(),
        })?;
    if op == OpCode::TAILCALL {
        engine.unload_context()?;
    }
    log::trace!("{op} into {code_hash}");
    engine.load_script(script, false)
}

fn syscall(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let name = engine.context_mut()?.read_var_string(MAX_SYSCALL_NAME_SIZE)?;
    let service = Rc::clone(engine.service());
    service.invoke(engine, &name)
}
