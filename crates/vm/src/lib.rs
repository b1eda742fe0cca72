//! # Sidechain VM
//!
//! A stack-based bytecode interpreter running NEO 2.x style contract
//! scripts. The engine owns an invocation stack of [`ExecutionContext`]s and
//! two data stacks, dispatches opcodes through a [`JumpTable`], meters steps
//! and gas, and hands named host functions to an [`InteropService`].
//!
//! ```
//! use sidechain_vm::{ExecutionEngine, InteropService, ScriptBuilder, VMState};
//!
//! let mut builder = ScriptBuilder::new();
//! builder.emit_push_int(2).emit_push_int(3).emit_opcode(sidechain_vm::OpCode::ADD);
//!
//! let mut engine = ExecutionEngine::new(InteropService::new());
//! engine.load_script(builder.to_array(), false).unwrap();
//! assert_eq!(engine.execute(), VMState::HALT);
//! ```

pub mod crypto;
pub mod error;
pub mod evaluation_stack;
pub mod execution_context;
pub mod execution_engine;
pub mod interop_service;
pub mod jump_table;
pub mod op_code;
pub mod script_builder;
pub mod script_table;
pub mod stack_item;
pub mod vm_state;

pub use crypto::{Crypto, Secp256r1Crypto};
pub use error::{FaultReason, VmError, VmResult};
pub use evaluation_stack::EvaluationStack;
pub use execution_context::ExecutionContext;
pub use execution_engine::{ExecutionEngine, ExecutionEngineLimits, TriggerType};
pub use interop_service::{InteropDescriptor, InteropMethod, InteropService};
pub use jump_table::{InstructionHandler, JumpTable};
pub use op_code::OpCode;
pub use script_builder::ScriptBuilder;
pub use script_table::ScriptTable;
pub use stack_item::{InteropInterface, InteropIterator, StackItem, StackItemType, StackMap};
pub use vm_state::VMState;
