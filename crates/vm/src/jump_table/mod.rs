//! Jump table module for the VM.
//!
//! Maps every opcode byte to its handler. Direct pushes (`0x01..=0x4B`) are
//! decoded by the engine before the table is consulted.

pub mod bitwise;
pub mod compound;
pub mod control;
pub mod crypto;
pub mod exceptions;
pub mod numeric;
pub mod push;
pub mod splice;
pub mod stack;

use num_traits::ToPrimitive;

use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::op_code::OpCode;

/// A handler for a VM instruction.
pub type InstructionHandler = fn(&mut ExecutionEngine, OpCode) -> VmResult<()>;

/// Represents a jump table for the VM.
#[derive(Clone)]
pub struct JumpTable {
    handlers: [Option<InstructionHandler>; 256],
}

impl Default for JumpTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JumpTable {
    /// Creates a jump table with every standard handler registered.
    pub fn new() -> Self {
        let mut jump_table = Self::empty();
        push::register_handlers(&mut jump_table);
        control::register_handlers(&mut jump_table);
        stack::register_handlers(&mut jump_table);
        splice::register_handlers(&mut jump_table);
        bitwise::register_handlers(&mut jump_table);
        numeric::register_handlers(&mut jump_table);
        crypto::register_handlers(&mut jump_table);
        compound::register_handlers(&mut jump_table);
        exceptions::register_handlers(&mut jump_table);
        jump_table
    }

    pub fn empty() -> Self {
        Self {
            handlers: [None; 256],
        }
    }

    /// Registers a handler for an opcode, replacing any previous one.
    pub fn register(&mut self, opcode: OpCode, handler: InstructionHandler) {
        self.handlers[opcode as usize] = Some(handler);
    }

    pub fn unregister(&mut self, opcode: OpCode) {
        self.handlers[opcode as usize] = None;
    }

    /// Gets the handler for an opcode.
    pub fn get(&self, opcode: OpCode) -> Option<InstructionHandler> {
        self.handlers[opcode as usize]
    }
}

/// Pops an integer and converts it to a non-negative index.
pub(crate) fn pop_index(engine: &mut ExecutionEngine) -> VmResult<usize> {
    let value = engine.pop()?.as_int();
    value
        .to_usize()
        .ok_or_else(|| VmError::invalid_operation_msg(format!("invalid index {value}")))
}

/// Rejects arrays longer than the configured element limit.
pub(crate) fn check_array_size(engine: &ExecutionEngine, size: usize) -> VmResult<()> {
    let limit = engine.limits().max_array_size;
    if size > limit {
        return Err(VmError::ItemTooLarge { size, limit });
    }
    Ok(())
}

/// Rejects byte arrays longer than the configured item limit.
pub(crate) fn check_item_size(engine: &ExecutionEngine, size: usize) -> VmResult<()> {
    let limit = engine.limits().max_item_size;
    if size > limit {
        return Err(VmError::ItemTooLarge { size, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_opcode_except_direct_pushes_has_a_handler() {
        let table = JumpTable::new();
        for byte in 0..=u8::MAX {
            if let Some(op) = OpCode::from_byte(byte) {
                if op == OpCode::PUSHBYTES1 || op == OpCode::PUSHBYTES75 {
                    continue;
                }
                assert!(table.get(op).is_some(), "missing handler for {op}");
            }
        }
    }
}
