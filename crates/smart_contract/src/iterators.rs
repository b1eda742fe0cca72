//! Cursors handed to scripts by `Storage.Find` and the `Iterator.*` calls.

use std::cell::RefCell;
use std::rc::Rc;

use sidechain_vm::{InteropIterator, StackItem};

/// Walks a snapshot of storage entries of one contract.
///
/// The snapshot is taken when the iterator is created; later writes to the
/// same keys are not observed.
#[derive(Debug, Clone, Default)]
pub struct StorageIterator {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    position: Option<usize>,
}

impl StorageIterator {
    pub fn new(entries: Vec<(Vec<u8>, Vec<u8>)>) -> Self {
        Self {
            entries,
            position: None,
        }
    }

    fn current(&self) -> Option<&(Vec<u8>, Vec<u8>)> {
        self.position.and_then(|position| self.entries.get(position))
    }
}

impl InteropIterator for StorageIterator {
    fn next(&mut self) -> bool {
        let next = self.position.map_or(0, |position| position + 1);
        self.position = Some(next.min(self.entries.len()));
        next < self.entries.len()
    }

    fn key(&self) -> Option<StackItem> {
        self.current().map(|(key, _)| StackItem::from_bytes(key.clone()))
    }

    fn value(&self) -> Option<StackItem> {
        self.current().map(|(_, value)| StackItem::from_bytes(value.clone()))
    }
}

/// Shared handle to an iterator living on a script's stack.
pub type SharedIterator = Rc<RefCell<dyn InteropIterator>>;

/// Enumerates the keys of another iterator as its values.
pub struct KeysIterator {
    inner: SharedIterator,
}

impl KeysIterator {
    pub fn new(inner: SharedIterator) -> Self {
        Self { inner }
    }
}

impl InteropIterator for KeysIterator {
    fn next(&mut self) -> bool {
        self.inner.borrow_mut().next()
    }

    fn key(&self) -> Option<StackItem> {
        self.inner.borrow().key()
    }

    fn value(&self) -> Option<StackItem> {
        self.inner.borrow().key()
    }
}

/// Enumerates the values of another iterator.
pub struct ValuesIterator {
    inner: SharedIterator,
}

impl ValuesIterator {
    pub fn new(inner: SharedIterator) -> Self {
        Self { inner }
    }
}

impl InteropIterator for ValuesIterator {
    fn next(&mut self) -> bool {
        self.inner.borrow_mut().next()
    }

    fn key(&self) -> Option<StackItem> {
        self.inner.borrow().key()
    }

    fn value(&self) -> Option<StackItem> {
        self.inner.borrow().value()
    }
}
