//! Sidechain configuration.
//!
//! Protocol constants shared by every crate in the workspace plus the
//! [`VmSettings`] type that tunes the contract engine at runtime.

mod settings;

pub use settings::{ConfigError, VmSettings};

/// Size of a transaction, block or asset hash (UInt256) in bytes.
pub const HASH_SIZE: usize = 32;
/// Size of a program hash (UInt168) in bytes.
pub const PROGRAM_HASH_SIZE: usize = 21;
/// Size of a bare script hash (UInt160) in bytes.
pub const ADDRESS_SIZE: usize = 20;
/// Size of a compressed secp256r1 public key.
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

/// Maximum number of non-push opcodes a single invocation may execute.
pub const MAX_STEPS: usize = 1200;
/// Maximum script size accepted by the engine.
pub const MAX_SCRIPT_SIZE: usize = 1024 * 1024;
/// Maximum combined size of the evaluation and alt stacks.
pub const MAX_STACK_SIZE: usize = 2048;
/// Maximum size of a single byte array produced by a script.
pub const MAX_ITEM_SIZE: usize = 1024 * 1024;
/// Maximum depth of the invocation stack.
pub const MAX_INVOCATION_STACK_SIZE: usize = 1024;
/// Maximum number of elements in an array or struct.
pub const MAX_ARRAY_SIZE: usize = 1024;
/// Maximum nesting depth accepted by the stack value serializer.
pub const MAX_SERIALIZE_DEPTH: usize = 16;
/// Maximum size in bytes of an integer operand.
pub const MAX_BIGINTEGER_SIZE: usize = 32;
/// Maximum shift applied by SHL/SHR.
pub const MAX_SHL_SHR: usize = 256;
/// Maximum length of a syscall name.
pub const MAX_SYSCALL_NAME_SIZE: usize = 252;

/// Maximum contract storage key length.
pub const MAX_STORAGE_KEY_SIZE: usize = 1024;
/// Maximum asset name length.
pub const MAX_ASSET_NAME_SIZE: usize = 1024;
/// Maximum asset precision.
pub const MAX_ASSET_PRECISION: u8 = 8;
/// Number of blocks an asset stays valid after registration or renewal.
pub const ASSET_EXPIRATION_BLOCKS: u32 = 2_000_000;
/// Maximum deployed contract size.
pub const MAX_CONTRACT_SIZE: usize = 1024 * 1024;
/// Maximum length of contract metadata fields (name, version, author, email, parameter list).
pub const MAX_CONTRACT_FIELD_SIZE: usize = 252;
/// Maximum length of a contract description.
pub const MAX_CONTRACT_DESCRIPTION_SIZE: usize = 65536;

/// One whole token expressed in fixed-point units.
pub const FIXED64_ONE: i64 = 100_000_000;
/// Default gas budget for a top-level invocation.
pub const DEFAULT_GAS_LIMIT: i64 = 10 * FIXED64_ONE;
