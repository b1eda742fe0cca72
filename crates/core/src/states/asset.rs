// Copyright (C) 2024-2025 The Sidechain Developers.
//
// asset.rs file belongs to the sidechain-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use super::string_size;
use crate::error::CoreError;
use crate::fixed64::Fixed64;
use crate::uint168::UInt168;
use crate::uint256::UInt256;
use sidechain_config::{COMPRESSED_PUBLIC_KEY_SIZE, MAX_ASSET_NAME_SIZE};
use sidechain_io::{helper, BinaryWriter, IoResult, MemoryReader, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum AssetType {
    Token = 0x00,
    Share = 0x01,
}

impl TryFrom<u8> for AssetType {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Token),
            0x01 => Ok(Self::Share),
            other => Err(CoreError::UnknownVariant {
                kind: "asset type",
                value: other,
            }),
        }
    }
}

/// A registered asset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssetState {
    pub asset_id: UInt256,
    pub asset_type: AssetType,
    pub name: String,
    pub amount: Fixed64,
    pub available: Fixed64,
    pub precision: u8,
    /// Compressed public key of the owner.
    pub owner: Vec<u8>,
    pub admin: UInt168,
    pub issuer: UInt168,
    /// Height after which the asset expires.
    pub expiration: u32,
    pub is_frozen: bool,
}

impl Serializable for AssetState {
    fn size(&self) -> usize {
        1 + UInt256::LENGTH
            + 1
            + string_size(&self.name)
            + 8
            + 8
            + 1
            + helper::get_var_bytes_size(self.owner.len())
            + UInt168::LENGTH * 2
            + 4
            + 1
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        super::write_version(writer);
        self.asset_id.serialize(writer);
        writer.write_u8(self.asset_type as u8);
        writer.write_var_string(&self.name);
        self.amount.serialize(writer);
        self.available.serialize(writer);
        writer.write_u8(self.precision);
        writer.write_var_bytes(&self.owner);
        self.admin.serialize(writer);
        self.issuer.serialize(writer);
        writer.write_u32(self.expiration);
        writer.write_bool(self.is_frozen);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        super::read_version(reader)?;
        Ok(Self {
            asset_id: UInt256::deserialize(reader)?,
            asset_type: AssetType::try_from(reader.read_u8()?)?,
            name: reader.read_var_string(MAX_ASSET_NAME_SIZE)?,
            amount: Fixed64::deserialize(reader)?,
            available: Fixed64::deserialize(reader)?,
            precision: reader.read_u8()?,
            owner: reader.read_var_bytes(COMPRESSED_PUBLIC_KEY_SIZE)?,
            admin: UInt168::deserialize(reader)?,
            issuer: UInt168::deserialize(reader)?,
            expiration: reader.read_u32()?,
            is_frozen: reader.read_bool()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidechain_io::SerializableExt;

    #[test]
    fn asset_state_round_trips() {
        let asset = AssetState {
            asset_id: UInt256::from_array([5; 32]),
            asset_type: AssetType::Share,
            name: "gold".to_string(),
            amount: Fixed64::from_whole(1000),
            available: Fixed64::ZERO,
            precision: 8,
            owner: vec![0x02; 33],
            admin: UInt168::from_array([0x21; 21]),
            issuer: UInt168::from_array([0x12; 21]),
            expiration: 2_000_001,
            is_frozen: false,
        };
        let bytes = asset.to_array();
        assert_eq!(bytes.len(), asset.size());
        assert_eq!(AssetState::from_array(&bytes).unwrap(), asset);
    }
}
