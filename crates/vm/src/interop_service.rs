//! Interop service module for the VM.
//!
//! The registry of named host functions reachable through `SYSCALL`. Each
//! handler pops its own arguments (last pushed, first popped) and pushes its
//! results; returning an error faults the invocation.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;

/// A host function reachable through `SYSCALL`.
pub type InteropMethod = Rc<dyn Fn(&mut ExecutionEngine) -> VmResult<()>>;

/// Represents an interop descriptor.
#[derive(Clone)]
pub struct InteropDescriptor {
    /// The name scripts use to reach the function
    pub name: String,

    /// The handler function
    pub handler: InteropMethod,

    /// Gas debited before the handler runs
    pub price: i64,
}

impl InteropDescriptor {
    pub fn new<F>(name: impl Into<String>, price: i64, handler: F) -> Self
    where
        F: Fn(&mut ExecutionEngine) -> VmResult<()> + 'static,
    {
        Self {
            name: name.into(),
            handler: Rc::new(handler),
            price,
        }
    }
}

impl fmt::Debug for InteropDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteropDescriptor")
            .field("name", &self.name)
            .field("price", &self.price)
            .finish()
    }
}

/// Name-keyed registry of host functions.
#[derive(Default, Clone)]
pub struct InteropService {
    methods: HashMap<String, InteropDescriptor>,
}

impl InteropService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor. Returns false, leaving the existing entry in
    /// place, when the name is already taken.
    pub fn register(&mut self, descriptor: InteropDescriptor) -> bool {
        if self.methods.contains_key(&descriptor.name) {
            log::warn!("syscall {} is already registered", descriptor.name);
            return false;
        }
        self.methods.insert(descriptor.name.clone(), descriptor);
        true
    }

    /// Registers every descriptor of `other` whose name is still free.
    pub fn merge(&mut self, other: InteropService) {
        for (_, descriptor) in other.methods {
            self.register(descriptor);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&InteropDescriptor> {
        self.methods.get(name)
    }

    pub fn get_price(&self, name: &str) -> Option<i64> {
        self.methods.get(name).map(|descriptor| descriptor.price)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Debits the descriptor's price and runs it. Handler errors come back
    /// wrapped with the syscall name.
    pub fn invoke(&self, engine: &mut ExecutionEngine, name: &str) -> VmResult<()> {
        let descriptor = self
            .methods
            .get(name)
            .ok_or_else(|| VmError::UnknownSyscall {
                name: name.to_string(),
            })?;
        engine.consume_gas(descriptor.price)?;
        log::trace!("syscall {name}");
        (descriptor.handler)(engine).map_err(|source| VmError::Syscall {
            name: name.to_string(),
            source: Box::new(source),
        })
    }
}

impl fmt::Debug for InteropService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.methods.keys().collect();
        names.sort();
        f.debug_struct("InteropService").field("methods", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut service = InteropService::new();
        assert!(service.register(InteropDescriptor::new("Test.A", 1, |_| Ok(()))));
        assert!(!service.register(InteropDescriptor::new("Test.A", 5, |_| Ok(()))));
        assert_eq!(service.get_price("Test.A"), Some(1));
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn merge_keeps_first_registration() {
        let mut base = InteropService::new();
        base.register(InteropDescriptor::new("Test.A", 1, |_| Ok(())));
        let mut extra = InteropService::new();
        extra.register(InteropDescriptor::new("Test.A", 9, |_| Ok(())));
        extra.register(InteropDescriptor::new("Test.B", 2, |_| Ok(())));
        base.merge(extra);
        assert_eq!(base.get_price("Test.A"), Some(1));
        assert!(base.contains("Test.B"));
    }
}
