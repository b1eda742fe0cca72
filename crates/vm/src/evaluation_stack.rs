//! Evaluation stack module for the VM.
//!
//! Indices used by `peek`, `remove` and `insert` count from the top: `0` is
//! the most recently pushed item.

use num_bigint::BigInt;

use crate::error::{VmError, VmResult};
use crate::stack_item::StackItem;

/// Represents the evaluation stack (and the alt stack) of the VM.
#[derive(Clone, Debug, Default)]
pub struct EvaluationStack {
    stack: Vec<StackItem>,
}

impl EvaluationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an item onto the stack.
    pub fn push(&mut self, item: StackItem) {
        self.stack.push(item);
    }

    /// Pops an item from the stack.
    pub fn pop(&mut self) -> VmResult<StackItem> {
        self.stack
            .pop()
            .ok_or_else(|| VmError::stack_underflow(1, 0))
    }

    pub fn pop_bool(&mut self) -> VmResult<bool> {
        Ok(self.pop()?.as_bool())
    }

    pub fn pop_int(&mut self) -> VmResult<BigInt> {
        Ok(self.pop()?.as_int())
    }

    pub fn pop_bytes(&mut self) -> VmResult<Vec<u8>> {
        Ok(self.pop()?.as_bytes())
    }

    /// Returns the item `n` positions below the top without removing it.
    pub fn peek(&self, n: usize) -> VmResult<&StackItem> {
        let index = self.index_from_top(n)?;
        Ok(&self.stack[index])
    }

    /// Removes and returns the item `n` positions below the top.
    pub fn remove(&mut self, n: usize) -> VmResult<StackItem> {
        let index = self.index_from_top(n)?;
        Ok(self.stack.remove(index))
    }

    /// Inserts `item` so that it ends up `n` positions below the top.
    pub fn insert(&mut self, n: usize, item: StackItem) -> VmResult<()> {
        if n > self.stack.len() {
            return Err(VmError::stack_underflow(n, self.stack.len()));
        }
        let index = self.stack.len() - n;
        self.stack.insert(index, item);
        Ok(())
    }

    /// Swaps the items `i` and `j` positions below the top.
    pub fn swap(&mut self, i: usize, j: usize) -> VmResult<()> {
        let a = self.index_from_top(i)?;
        let b = self.index_from_top(j)?;
        self.stack.swap(a, b);
        Ok(())
    }

    /// Reverses the order of the top `n` items.
    pub fn reverse(&mut self, n: usize) -> VmResult<()> {
        if n > self.stack.len() {
            return Err(VmError::stack_underflow(n, self.stack.len()));
        }
        let start = self.stack.len() - n;
        self.stack[start..].reverse();
        Ok(())
    }

    fn index_from_top(&self, n: usize) -> VmResult<usize> {
        if n >= self.stack.len() {
            return Err(VmError::stack_underflow(n + 1, self.stack.len()));
        }
        Ok(self.stack.len() - 1 - n)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Iterates from the top of the stack down.
    pub fn iter(&self) -> impl Iterator<Item = &StackItem> {
        self.stack.iter().rev()
    }
}
