use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::THROW, throw);
    jump_table.register(OpCode::THROWIFNOT, throw_if_not);
}

fn throw(_engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    Err(VmError::Throw)
}

fn throw_if_not(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    if engine.evaluation_stack_mut().pop_bool()? {
        Ok(())
    } else {
        Err(VmError::Throw)
    }
}
