// Copyright (C) 2024-2025 The Sidechain Developers.
//
// lib.rs file belongs to the sidechain-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Chain data types consumed by the contract engine.
//!
//! Hash newtypes, transactions, headers and blocks as the ledger hands them
//! to the engine, the ledger states contracts create and mutate, and the
//! helpers that derive program hashes from scripts.

pub mod block;
pub mod error;
pub mod fixed64;
pub mod hash;
pub mod states;
pub mod transaction;
pub mod uint168;
pub mod uint256;

pub use block::{Block, Header};
pub use error::{CoreError, CoreResult};
pub use fixed64::Fixed64;
pub use hash::{
    create_signature_redeem_script, hash160, hash256, sha256, to_code_hash, to_program_hash,
    ProgramPrefix,
};
pub use states::{
    AccountState, AssetState, AssetType, ContractState, FunctionCode, StateKind, StateValue,
    StorageContext, StorageItem, StorageKey,
};
pub use transaction::{
    Attribute, AttributeUsage, Input, OutPoint, Output, Payload, PayloadInvoke, Transaction,
    TransactionType,
};
pub use uint168::UInt168;
pub use uint256::UInt256;
