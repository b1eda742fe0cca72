//! Execution context module for the VM.
//!
//! A context is one frame of the invocation stack: a shared, immutable script
//! buffer plus the frame's own instruction pointer.

use std::cell::OnceCell;
use std::collections::HashSet;
use std::rc::Rc;

use sidechain_core::{to_code_hash, UInt168};
use sidechain_io::{IoResult, MemoryReader};

use crate::error::VmResult;

#[derive(Clone, Debug)]
pub struct ExecutionContext {
    script: Rc<[u8]>,
    instruction_pointer: usize,
    push_only: bool,
    breakpoints: HashSet<usize>,
    code_hash: OnceCell<UInt168>,
}

impl ExecutionContext {
    pub fn new(script: Rc<[u8]>, push_only: bool) -> Self {
        Self {
            script,
            instruction_pointer: 0,
            push_only,
            breakpoints: HashSet::new(),
            code_hash: OnceCell::new(),
        }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    pub fn script_rc(&self) -> Rc<[u8]> {
        Rc::clone(&self.script)
    }

    pub fn instruction_pointer(&self) -> usize {
        self.instruction_pointer
    }

    pub fn set_instruction_pointer(&mut self, position: usize) {
        self.instruction_pointer = position;
    }

    pub fn push_only(&self) -> bool {
        self.push_only
    }

    /// True once the pointer has run off the end of the script.
    pub fn at_end(&self) -> bool {
        self.instruction_pointer >= self.script.len()
    }

    /// The opcode byte at the pointer, without consuming it.
    pub fn next_instruction(&self) -> Option<u8> {
        self.script.get(self.instruction_pointer).copied()
    }

    /// Hash identifying the contract this script belongs to. Computed once.
    pub fn code_hash(&self) -> UInt168 {
        *self.code_hash.get_or_init(|| to_code_hash(&self.script))
    }

    fn read<T>(&mut self, f: impl FnOnce(&mut MemoryReader) -> IoResult<T>) -> VmResult<T> {
        let mut reader = MemoryReader::with_position(&self.script, self.instruction_pointer);
        let value = f(&mut reader)?;
        self.instruction_pointer = reader.position();
        Ok(value)
    }

    pub fn read_u8(&mut self) -> VmResult<u8> {
        self.read(|reader| reader.read_u8())
    }

    pub fn read_i16(&mut self) -> VmResult<i16> {
        self.read(|reader| reader.read_i16())
    }

    pub fn read_u16(&mut self) -> VmResult<u16> {
        self.read(|reader| reader.read_u16())
    }

    pub fn read_u32(&mut self) -> VmResult<u32> {
        self.read(|reader| reader.read_u32())
    }

    pub fn read_bytes(&mut self, count: usize) -> VmResult<Vec<u8>> {
        self.read(|reader| reader.read_bytes(count))
    }

    pub fn read_var_string(&mut self, max: usize) -> VmResult<String> {
        self.read(|reader| reader.read_var_string(max))
    }

    pub fn add_breakpoint(&mut self, position: usize) {
        self.breakpoints.insert(position);
    }

    pub fn remove_breakpoint(&mut self, position: usize) -> bool {
        self.breakpoints.remove(&position)
    }

    /// Whether the pointer sits on a breakpoint.
    pub fn at_breakpoint(&self) -> bool {
        self.breakpoints.contains(&self.instruction_pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_pointer() {
        let mut context = ExecutionContext::new(Rc::from(vec![0x62, 0x03, 0x00, 0x61]), false);
        assert_eq!(context.next_instruction(), Some(0x62));
        assert_eq!(context.read_u8().unwrap(), 0x62);
        assert_eq!(context.read_i16().unwrap(), 3);
        assert_eq!(context.instruction_pointer(), 3);
        assert!(context.read_bytes(2).is_err());
        assert_eq!(context.instruction_pointer(), 3);
    }

    #[test]
    fn clone_shares_script_not_pointer() {
        let mut context = ExecutionContext::new(Rc::from(vec![0x61, 0x61]), false);
        let mut copy = context.clone();
        copy.set_instruction_pointer(1);
        assert_eq!(context.instruction_pointer(), 0);
        assert!(Rc::ptr_eq(&context.script_rc(), &copy.script_rc()));
        context.read_u8().unwrap();
        assert_eq!(copy.code_hash(), context.code_hash());
    }

    #[test]
    fn breakpoints() {
        let mut context = ExecutionContext::new(Rc::from(vec![0x61]), false);
        context.add_breakpoint(0);
        assert!(context.at_breakpoint());
        assert!(context.remove_breakpoint(0));
        assert!(!context.remove_breakpoint(0));
    }
}
