// Copyright (C) 2024-2025 The Sidechain Developers.
//
// mod.rs file belongs to the sidechain-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Ledger states created and mutated by contracts.
//!
//! Every state is encoded with a leading state-version byte; the storage
//! layer keys them by a one-byte namespace prefix.

mod account;
mod asset;
mod contract;
mod storage;

pub use account::AccountState;
pub use asset::{AssetState, AssetType};
pub use contract::{ContractState, FunctionCode};
pub use storage::{StorageContext, StorageItem, StorageKey};

use sidechain_io::{BinaryWriter, IoError, IoResult, MemoryReader, SerializableExt};

/// Version byte written ahead of every state.
pub const STATE_VERSION: u8 = 0;

pub(crate) fn write_version(writer: &mut BinaryWriter) {
    writer.write_u8(STATE_VERSION);
}

pub(crate) fn read_version(reader: &mut MemoryReader) -> IoResult<()> {
    match reader.read_u8()? {
        STATE_VERSION => Ok(()),
        other => Err(IoError::invalid_format(format!(
            "unsupported state version {other}"
        ))),
    }
}

/// Which state type a namespace holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Account,
    Asset,
    Contract,
    Storage,
}

/// Any state the write-set can buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValue {
    Account(AccountState),
    Asset(AssetState),
    Contract(ContractState),
    Storage(StorageItem),
}

impl StateValue {
    pub fn kind(&self) -> StateKind {
        match self {
            StateValue::Account(_) => StateKind::Account,
            StateValue::Asset(_) => StateKind::Asset,
            StateValue::Contract(_) => StateKind::Contract,
            StateValue::Storage(_) => StateKind::Storage,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            StateValue::Account(state) => state.to_array(),
            StateValue::Asset(state) => state.to_array(),
            StateValue::Contract(state) => state.to_array(),
            StateValue::Storage(item) => item.to_array(),
        }
    }

    pub fn from_bytes(kind: StateKind, data: &[u8]) -> IoResult<Self> {
        Ok(match kind {
            StateKind::Account => StateValue::Account(AccountState::from_array(data)?),
            StateKind::Asset => StateValue::Asset(AssetState::from_array(data)?),
            StateKind::Contract => StateValue::Contract(ContractState::from_array(data)?),
            StateKind::Storage => StateValue::Storage(StorageItem::from_array(data)?),
        })
    }

    pub fn as_contract(&self) -> Option<&ContractState> {
        match self {
            StateValue::Contract(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<&AssetState> {
        match self {
            StateValue::Asset(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_account(&self) -> Option<&AccountState> {
        match self {
            StateValue::Account(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_storage(&self) -> Option<&StorageItem> {
        match self {
            StateValue::Storage(item) => Some(item),
            _ => None,
        }
    }
}

impl From<StorageItem> for StateValue {
    fn from(item: StorageItem) -> Self {
        StateValue::Storage(item)
    }
}

impl From<ContractState> for StateValue {
    fn from(state: ContractState) -> Self {
        StateValue::Contract(state)
    }
}

impl From<AssetState> for StateValue {
    fn from(state: AssetState) -> Self {
        StateValue::Asset(state)
    }
}

impl From<AccountState> for StateValue {
    fn from(state: AccountState) -> Self {
        StateValue::Account(state)
    }
}

pub(crate) fn string_size(value: &str) -> usize {
    sidechain_io::helper::get_var_bytes_size(value.len())
}

