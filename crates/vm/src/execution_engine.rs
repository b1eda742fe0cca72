//! Execution engine module for the VM.
//!
//! The engine owns the invocation stack and both data stacks. [`execute`]
//! runs until HALT, FAULT or a breakpoint; the step-control methods drive
//! the same loop one instruction at a time for debuggers.
//!
//! [`execute`]: ExecutionEngine::execute

use std::rc::Rc;

use sidechain_config::{
    VmSettings, DEFAULT_GAS_LIMIT, MAX_ARRAY_SIZE, MAX_BIGINTEGER_SIZE, MAX_INVOCATION_STACK_SIZE,
    MAX_ITEM_SIZE, MAX_SCRIPT_SIZE, MAX_SERIALIZE_DEPTH, MAX_SHL_SHR, MAX_STACK_SIZE, MAX_STEPS,
};
use sidechain_core::{Transaction, UInt168};

use crate::crypto::{Crypto, Secp256r1Crypto};
use crate::error::{FaultReason, VmError, VmResult};
use crate::evaluation_stack::EvaluationStack;
use crate::execution_context::ExecutionContext;
use crate::interop_service::InteropService;
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;
use crate::script_table::ScriptTable;
use crate::stack_item::StackItem;
use crate::vm_state::VMState;

/// Restrictions on the VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEngineLimits {
    /// The maximum number of non-push instructions per invocation.
    pub max_steps: usize,

    /// The maximum combined size of the evaluation and alt stacks.
    pub max_stack_size: usize,

    /// The maximum size of a byte array item.
    pub max_item_size: usize,

    /// The maximum number of frames on the invocation stack.
    pub max_invocation_stack_size: usize,

    /// The maximum number of elements in an array or struct.
    pub max_array_size: usize,

    /// The maximum nesting depth for stack value serialization.
    pub max_serialize_depth: usize,

    /// The maximum size in bytes of an integer operand or result.
    pub max_bigint_size: usize,

    /// The maximum shift for SHL and SHR.
    pub max_shift: usize,

    /// The maximum size of a script loaded into a context.
    pub max_script_size: usize,
}

impl ExecutionEngineLimits {
    /// The default execution engine limits.
    pub const DEFAULT: Self = Self {
        max_steps: MAX_STEPS,
        max_stack_size: MAX_STACK_SIZE,
        max_item_size: MAX_ITEM_SIZE,
        max_invocation_stack_size: MAX_INVOCATION_STACK_SIZE,
        max_array_size: MAX_ARRAY_SIZE,
        max_serialize_depth: MAX_SERIALIZE_DEPTH,
        max_bigint_size: MAX_BIGINTEGER_SIZE,
        max_shift: MAX_SHL_SHR,
        max_script_size: MAX_SCRIPT_SIZE,
    };
}

impl Default for ExecutionEngineLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<&VmSettings> for ExecutionEngineLimits {
    fn from(settings: &VmSettings) -> Self {
        Self {
            max_steps: settings.max_steps,
            max_stack_size: settings.max_stack_size,
            max_item_size: settings.max_item_size,
            max_invocation_stack_size: settings.max_invocation_stack_size,
            max_array_size: settings.max_array_size,
            max_serialize_depth: settings.max_serialize_depth,
            ..Self::DEFAULT
        }
    }
}

/// Why a script is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TriggerType {
    /// Witness verification; no state writes.
    Verification = 0x00,
    /// Transaction application.
    Application = 0x10,
}

/// The VM.
pub struct ExecutionEngine {
    state: VMState,
    invocation_stack: Vec<ExecutionContext>,
    evaluation_stack: EvaluationStack,
    alt_stack: EvaluationStack,
    jump_table: JumpTable,
    service: Rc<InteropService>,
    script_table: Option<Rc<dyn ScriptTable>>,
    crypto: Rc<dyn Crypto>,
    container: Option<Rc<Transaction>>,
    trigger: TriggerType,
    limits: ExecutionEngineLimits,
    gas_limit: i64,
    gas_consumed: i64,
    op_count: usize,
    fault: Option<VmError>,
}

impl ExecutionEngine {
    /// Creates an engine with default limits, secp256r1 crypto, no script
    /// table and no container.
    pub fn new(service: InteropService) -> Self {
        Self::with_service(Rc::new(service))
    }

    pub fn with_service(service: Rc<InteropService>) -> Self {
        Self {
            state: VMState::BREAK,
            invocation_stack: Vec::new(),
            evaluation_stack: EvaluationStack::new(),
            alt_stack: EvaluationStack::new(),
            jump_table: JumpTable::new(),
            service,
            script_table: None,
            crypto: Rc::new(Secp256r1Crypto),
            container: None,
            trigger: TriggerType::Application,
            limits: ExecutionEngineLimits::DEFAULT,
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_consumed: 0,
            op_count: 0,
            fault: None,
        }
    }

    pub fn with_limits(mut self, limits: ExecutionEngineLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: i64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_script_table(mut self, table: Rc<dyn ScriptTable>) -> Self {
        self.script_table = Some(table);
        self
    }

    pub fn with_crypto(mut self, crypto: Rc<dyn Crypto>) -> Self {
        self.crypto = crypto;
        self
    }

    pub fn with_container(mut self, container: Rc<Transaction>) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerType) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_jump_table(mut self, jump_table: JumpTable) -> Self {
        self.jump_table = jump_table;
        self
    }

    pub fn state(&self) -> VMState {
        self.state
    }

    pub fn limits(&self) -> &ExecutionEngineLimits {
        &self.limits
    }

    pub fn trigger(&self) -> TriggerType {
        self.trigger
    }

    pub fn crypto(&self) -> &dyn Crypto {
        self.crypto.as_ref()
    }

    pub fn script_container(&self) -> Option<&Rc<Transaction>> {
        self.container.as_ref()
    }

    pub fn service(&self) -> &Rc<InteropService> {
        &self.service
    }

    pub fn script_table(&self) -> Option<&Rc<dyn ScriptTable>> {
        self.script_table.as_ref()
    }

    pub fn op_count(&self) -> usize {
        self.op_count
    }

    pub fn gas_consumed(&self) -> i64 {
        self.gas_consumed
    }

    pub fn gas_limit(&self) -> i64 {
        self.gas_limit
    }

    /// The error that faulted the engine, if any.
    pub fn fault_error(&self) -> Option<&VmError> {
        self.fault.as_ref()
    }

    pub fn fault_reason(&self) -> Option<FaultReason> {
        self.fault.as_ref().map(VmError::fault_reason)
    }

    pub fn invocation_stack(&self) -> &[ExecutionContext] {
        &self.invocation_stack
    }

    pub fn evaluation_stack(&self) -> &EvaluationStack {
        &self.evaluation_stack
    }

    pub fn evaluation_stack_mut(&mut self) -> &mut EvaluationStack {
        &mut self.evaluation_stack
    }

    pub fn alt_stack(&self) -> &EvaluationStack {
        &self.alt_stack
    }

    pub fn alt_stack_mut(&mut self) -> &mut EvaluationStack {
        &mut self.alt_stack
    }

    pub fn current_context(&self) -> Option<&ExecutionContext> {
        self.invocation_stack.last()
    }

    pub fn current_context_mut(&mut self) -> Option<&mut ExecutionContext> {
        self.invocation_stack.last_mut()
    }

    /// The context that called the current one.
    pub fn calling_context(&self) -> Option<&ExecutionContext> {
        let len = self.invocation_stack.len();
        if len < 2 {
            return None;
        }
        self.invocation_stack.get(len - 2)
    }

    pub fn entry_context(&self) -> Option<&ExecutionContext> {
        self.invocation_stack.first()
    }

    pub(crate) fn context_mut(&mut self) -> VmResult<&mut ExecutionContext> {
        self.invocation_stack
            .last_mut()
            .ok_or_else(|| VmError::invalid_operation_msg("no current context"))
    }

    pub fn executing_script_hash(&self) -> Option<UInt168> {
        self.current_context().map(ExecutionContext::code_hash)
    }

    pub fn calling_script_hash(&self) -> Option<UInt168> {
        self.calling_context().map(ExecutionContext::code_hash)
    }

    pub fn entry_script_hash(&self) -> Option<UInt168> {
        self.entry_context().map(ExecutionContext::code_hash)
    }

    pub fn push(&mut self, item: StackItem) {
        self.evaluation_stack.push(item);
    }

    pub fn pop(&mut self) -> VmResult<StackItem> {
        self.evaluation_stack.pop()
    }

    pub fn peek(&self, n: usize) -> VmResult<&StackItem> {
        self.evaluation_stack.peek(n)
    }

    /// Top of the evaluation stack after execution.
    pub fn result(&self) -> Option<&StackItem> {
        self.evaluation_stack.peek(0).ok()
    }

    /// Pushes a new context for `script`.
    pub fn load_script(&mut self, script: impl Into<Rc<[u8]>>, push_only: bool) -> VmResult<()> {
        let script = script.into();
        if script.len() > self.limits.max_script_size {
            return Err(VmError::ItemTooLarge {
                size: script.len(),
                limit: self.limits.max_script_size,
            });
        }
        self.load_context(ExecutionContext::new(script, push_only))
    }

    pub(crate) fn load_context(&mut self, context: ExecutionContext) -> VmResult<()> {
        if self.invocation_stack.len() >= self.limits.max_invocation_stack_size {
            return Err(VmError::InvocationDepthExceeded {
                depth: self.invocation_stack.len() + 1,
                limit: self.limits.max_invocation_stack_size,
            });
        }
        self.invocation_stack.push(context);
        Ok(())
    }

    pub(crate) fn unload_context(&mut self) -> VmResult<ExecutionContext> {
        self.invocation_stack
            .pop()
            .ok_or_else(|| VmError::invalid_operation_msg("invocation stack is empty"))
    }

    /// Debits gas. Overflow counts as exhaustion.
    pub fn consume_gas(&mut self, amount: i64) -> VmResult<()> {
        let total = self
            .gas_consumed
            .checked_add(amount)
            .filter(|total| *total <= self.gas_limit)
            .ok_or(VmError::GasExhausted {
                required: amount,
                remaining: self.gas_limit.saturating_sub(self.gas_consumed),
            })?;
        self.gas_consumed = total;
        Ok(())
    }

    /// Runs until HALT, FAULT or BREAK.
    pub fn execute(&mut self) -> VMState {
        if self.state == VMState::BREAK {
            self.state = VMState::NONE;
        }
        while self.state == VMState::NONE {
            self.step();
        }
        self.state
    }

    /// Executes exactly one instruction, leaving BREAK set if it was.
    pub fn step_into(&mut self) -> VMState {
        if self.state.is_terminal() {
            return self.state;
        }
        let paused = self.state == VMState::BREAK;
        self.state = VMState::NONE;
        self.step();
        if paused && self.state == VMState::NONE {
            self.state = VMState::BREAK;
        }
        self.state
    }

    /// Executes one instruction and keeps going until control is back at
    /// the current call depth.
    pub fn step_over(&mut self) -> VMState {
        if self.state.is_terminal() {
            return self.state;
        }
        let depth = self.invocation_stack.len();
        self.state = VMState::NONE;
        self.step();
        while self.state == VMState::NONE && self.invocation_stack.len() > depth {
            self.step();
        }
        self.pause()
    }

    /// Runs until the current context returns.
    pub fn step_out(&mut self) -> VMState {
        if self.state.is_terminal() {
            return self.state;
        }
        let depth = self.invocation_stack.len();
        self.state = VMState::NONE;
        while self.state == VMState::NONE && self.invocation_stack.len() >= depth {
            self.step();
        }
        self.pause()
    }

    /// Runs at most `steps` instructions, then pauses in BREAK.
    pub fn run_steps(&mut self, steps: usize) -> VMState {
        if self.state.is_terminal() {
            return self.state;
        }
        self.state = VMState::NONE;
        for _ in 0..steps {
            self.step();
            if self.state != VMState::NONE {
                return self.state;
            }
        }
        self.pause()
    }

    fn pause(&mut self) -> VMState {
        if self.state == VMState::NONE {
            self.state = VMState::BREAK;
        }
        self.state
    }

    /// Sets a breakpoint in the current context.
    pub fn add_breakpoint(&mut self, position: usize) -> bool {
        match self.current_context_mut() {
            Some(context) => {
                context.add_breakpoint(position);
                true
            }
            None => false,
        }
    }

    pub fn remove_breakpoint(&mut self, position: usize) -> bool {
        self.current_context_mut()
            .map(|context| context.remove_breakpoint(position))
            .unwrap_or(false)
    }

    fn step(&mut self) {
        if self.invocation_stack.is_empty() {
            self.state = VMState::HALT;
            return;
        }
        if let Err(err) = self.execute_next() {
            self.on_fault(err);
            return;
        }
        if self.invocation_stack.is_empty() {
            self.state = VMState::HALT;
        } else if self.state == VMState::NONE
            && self.current_context().is_some_and(ExecutionContext::at_breakpoint)
        {
            self.state = VMState::BREAK;
        }
    }

    /// Fetches, decodes and dispatches the next instruction.
    pub fn execute_next(&mut self) -> VmResult<()> {
        let context = self.context_mut()?;
        let byte = if context.at_end() {
            OpCode::RET.as_byte()
        } else {
            context.read_u8()?
        };
        let push_only = context.push_only();

        if !OpCode::is_push(byte) {
            if push_only && byte != OpCode::RET.as_byte() {
                return Err(VmError::PushOnlyViolation { opcode: byte });
            }
            self.op_count += 1;
            if self.op_count > self.limits.max_steps {
                return Err(VmError::StepLimitExceeded {
                    limit: self.limits.max_steps,
                });
            }
        }

        if (OpCode::PUSHBYTES1.as_byte()..=OpCode::PUSHBYTES75.as_byte()).contains(&byte) {
            let data = self.context_mut()?.read_bytes(usize::from(byte))?;
            self.push(StackItem::ByteArray(data));
        } else {
            let opcode = OpCode::from_byte(byte).ok_or(VmError::InvalidOpcode(byte))?;
            let handler = self
                .jump_table
                .get(opcode)
                .ok_or(VmError::InvalidOpcode(byte))?;
            handler(self, opcode)?;
        }

        self.check_stack_size()
    }

    fn check_stack_size(&self) -> VmResult<()> {
        let size = self.evaluation_stack.len() + self.alt_stack.len();
        if size > self.limits.max_stack_size {
            return Err(VmError::StackOverflow {
                size,
                limit: self.limits.max_stack_size,
            });
        }
        Ok(())
    }

    fn on_fault(&mut self, err: VmError) {
        log::debug!(
            "vm fault after {} steps ({:?}): {}",
            self.op_count,
            err.fault_reason(),
            err
        );
        self.state = VMState::FAULT;
        self.fault = Some(err);
    }
}

impl std::fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("state", &self.state)
            .field("invocation_depth", &self.invocation_stack.len())
            .field("evaluation_stack", &self.evaluation_stack.len())
            .field("alt_stack", &self.alt_stack.len())
            .field("op_count", &self.op_count)
            .field("gas_consumed", &self.gas_consumed)
            .finish()
    }
}
