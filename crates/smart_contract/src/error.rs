//! Error types for the syscall surface.

use sidechain_core::CoreError;
use sidechain_io::IoError;
use sidechain_persistence::StorageError;
use sidechain_vm::VmError;
use thiserror::Error;

/// Why a host function rejected a call.
///
/// Handlers return these through [`VmError::Host`], so the invocation
/// faults with [`FaultReason::HostFunction`](sidechain_vm::FaultReason) and
/// the caller can still read the underlying cause.
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("invalid {what}: {reason}")]
    InvalidArgument { what: &'static str, reason: String },

    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },

    #[error("the engine has no script container")]
    NoContainer,

    #[error("no script is executing")]
    NoExecutingScript,

    #[error("contract {code_hash} is not deployed")]
    ContractNotDeployed { code_hash: String },

    #[error("storage context of {code_hash} is read-only")]
    ReadOnlyContext { code_hash: String },

    #[error("state writes are not allowed under the verification trigger")]
    WriteInVerification,

    #[error("witness of {program_hash} is missing")]
    WitnessMissing { program_hash: String },

    #[error("contract {code_hash} was not created by the executing script")]
    NotContractCreator { code_hash: String },

    #[error("script rejected: {0}")]
    Script(#[source] VmError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Io(#[from] IoError),
}

impl ContractError {
    pub fn invalid_argument<S: Into<String>>(what: &'static str, reason: S) -> Self {
        Self::InvalidArgument {
            what,
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }
}

impl From<ContractError> for VmError {
    fn from(err: ContractError) -> Self {
        VmError::host(err)
    }
}

pub type ContractResult<T> = std::result::Result<T, ContractError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sidechain_vm::FaultReason;

    #[test]
    fn converts_into_host_fault() {
        let err: VmError = ContractError::not_found("header", 7).into();
        assert_eq!(err.fault_reason(), FaultReason::HostFunction);
        assert_eq!(err.to_string(), "host function failed: header 7 not found");
    }
}
