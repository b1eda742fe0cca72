//! Error types for the VM.

use sidechain_io::IoError;
use thiserror::Error;

/// Why an invocation faulted, for callers that only need the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultReason {
    /// Malformed bytecode, bad jump, stack underflow, unknown opcode.
    Structural,
    /// Step, gas, stack or size limit exceeded.
    ResourceExhausted,
    /// A syscall rejected its arguments or its host lookup failed.
    HostFunction,
    /// An operand had the wrong variant.
    TypeMismatch,
}

#[derive(Error, Debug)]
pub enum VmError {
    #[error("stack underflow: needed {needed} items, {available} available")]
    StackUnderflow { needed: usize, available: usize },

    #[error("stack size {size} exceeds limit {limit}")]
    StackOverflow { size: usize, limit: usize },

    #[error("invalid opcode {0:#04x}")]
    InvalidOpcode(u8),

    #[error("opcode {opcode:#04x} is not allowed in a push-only context")]
    PushOnlyViolation { opcode: u8 },

    #[error("jump target {target} outside script of length {length}")]
    InvalidJump { target: i64, length: usize },

    #[error("malformed instruction: {0}")]
    Malformed(#[from] IoError),

    #[error("step limit {limit} exceeded")]
    StepLimitExceeded { limit: usize },

    #[error("gas exhausted: {required} required, {remaining} remaining")]
    GasExhausted { required: i64, remaining: i64 },

    #[error("item size {size} exceeds limit {limit}")]
    ItemTooLarge { size: usize, limit: usize },

    #[error("invocation depth {depth} exceeds limit {limit}")]
    InvocationDepthExceeded { depth: usize, limit: usize },

    #[error("type mismatch: expected {expected}, found {found}")]
    InvalidType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid operation: {message}")]
    InvalidOperation { message: String },

    #[error("unknown syscall {name}")]
    UnknownSyscall { name: String },

    #[error("no script for contract {hash}")]
    ScriptNotFound { hash: String },

    #[error("syscall {name} failed: {source}")]
    Syscall {
        name: String,
        #[source]
        source: Box<VmError>,
    },

    #[error("host function failed: {0}")]
    Host(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("serialization failed: {message}")]
    Serialization { message: String },

    #[error("script raised an exception")]
    Throw,
}

impl VmError {
    pub fn stack_underflow(needed: usize, available: usize) -> Self {
        Self::StackUnderflow { needed, available }
    }

    pub fn invalid_operation_msg<S: Into<String>>(message: S) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    pub fn invalid_type(expected: &'static str, found: &'static str) -> Self {
        Self::InvalidType { expected, found }
    }

    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Wraps an error raised by host code.
    pub fn host<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Host(err.into())
    }

    pub fn fault_reason(&self) -> FaultReason {
        match self {
            VmError::StepLimitExceeded { .. }
            | VmError::GasExhausted { .. }
            | VmError::StackOverflow { .. }
            | VmError::ItemTooLarge { .. }
            | VmError::InvocationDepthExceeded { .. } => FaultReason::ResourceExhausted,
            VmError::InvalidType { .. } => FaultReason::TypeMismatch,
            VmError::Syscall { source, .. } => source.fault_reason(),
            VmError::Host(_) | VmError::Serialization { .. } => FaultReason::HostFunction,
            VmError::StackUnderflow { .. }
            | VmError::InvalidOpcode(_)
            | VmError::PushOnlyViolation { .. }
            | VmError::InvalidJump { .. }
            | VmError::Malformed(_)
            | VmError::InvalidOperation { .. }
            | VmError::UnknownSyscall { .. }
            | VmError::ScriptNotFound { .. }
            | VmError::Throw => FaultReason::Structural,
        }
    }
}

/// Result type for VM operations.
pub type VmResult<T> = std::result::Result<T, VmError>;
