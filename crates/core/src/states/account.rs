// Copyright (C) 2024-2025 The Sidechain Developers.
//
// account.rs file belongs to the sidechain-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::fixed64::Fixed64;
use crate::uint168::UInt168;
use crate::uint256::UInt256;
use sidechain_io::{helper, BinaryWriter, IoResult, MemoryReader, Serializable};
use std::collections::BTreeMap;

const MAX_BALANCES: usize = 1024;

/// Balances held by one program hash.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccountState {
    pub program_hash: UInt168,
    pub is_frozen: bool,
    pub balances: BTreeMap<UInt256, Fixed64>,
}

impl AccountState {
    pub fn new(program_hash: UInt168) -> Self {
        Self {
            program_hash,
            is_frozen: false,
            balances: BTreeMap::new(),
        }
    }

    /// Balance of `asset_id`, zero when the account never held it.
    pub fn balance(&self, asset_id: &UInt256) -> Fixed64 {
        self.balances.get(asset_id).copied().unwrap_or_default()
    }
}

impl Serializable for AccountState {
    fn size(&self) -> usize {
        1 + UInt168::LENGTH
            + 1
            + helper::get_var_size(self.balances.len() as u64)
            + self.balances.len() * (UInt256::LENGTH + 8)
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        super::write_version(writer);
        self.program_hash.serialize(writer);
        writer.write_bool(self.is_frozen);
        writer.write_var_int(self.balances.len() as u64);
        for (asset_id, value) in &self.balances {
            asset_id.serialize(writer);
            value.serialize(writer);
        }
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        super::read_version(reader)?;
        let program_hash = UInt168::deserialize(reader)?;
        let is_frozen = reader.read_bool()?;
        let count = reader.read_var_int(MAX_BALANCES as u64)?;
        let mut balances = BTreeMap::new();
        for _ in 0..count {
            let asset_id = UInt256::deserialize(reader)?;
            balances.insert(asset_id, Fixed64::deserialize(reader)?);
        }
        Ok(Self {
            program_hash,
            is_frozen,
            balances,
        })
    }
}
