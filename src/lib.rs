//! # sidechain-rs: contract execution core of an Elastos sidechain
//!
//! A NEO 2.x style stack VM and the state plumbing around it:
//!
//! - [`vm`]: value model, opcode table, execution engine and the syscall
//!   registry
//! - [`smart_contract`]: the `Neo.*` syscalls, split into a read-only
//!   `StateReader` and a writing `StateMachine`, plus the
//!   `ApplicationEngine` that commits or discards a run's writes
//! - [`persistence`]: `DBCache`, `CloneCache` and the `RWSet` write-set over
//!   a byte-keyed `Store`
//! - [`core`]: chain data, ledger states and hashing helpers
//!
//! ## Quick Start
//!
//! ```rust
//! use sidechain_rs::prelude::*;
//! use sidechain_rs::runner::run_script;
//!
//! let mut builder = ScriptBuilder::new();
//! builder.emit_push_int(2).emit_push_int(3).emit_opcode(OpCode::ADD);
//!
//! let engine = run_script(&builder.to_array(), &VmSettings::default()).unwrap();
//! assert_eq!(engine.state(), VMState::HALT);
//! ```

pub use sidechain_config as config;
pub use sidechain_core as core;
pub use sidechain_io as io;
pub use sidechain_persistence as persistence;
pub use sidechain_smart_contract as smart_contract;
pub use sidechain_vm as vm;

pub mod logging;
pub mod runner;

pub mod prelude {
    pub use crate::config::VmSettings;
    pub use crate::core::{Transaction, UInt168, UInt256};
    pub use crate::persistence::{CloneCache, DBCache, DataCache, MemoryStore, Store};
    pub use crate::smart_contract::{ApplicationEngine, Blockchain, EmptyChain, StateMachine};
    pub use crate::vm::{ExecutionEngine, OpCode, ScriptBuilder, StackItem, TriggerType, VMState};
}
