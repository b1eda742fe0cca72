// Copyright (C) 2024-2025 The Sidechain Developers.
//
// block.rs file belongs to the sidechain-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::hash::hash256;
use crate::transaction::Transaction;
use crate::uint256::UInt256;
use sidechain_io::{helper, BinaryWriter, IoResult, MemoryReader, Serializable, SerializableExt};

const MAX_BLOCK_TRANSACTIONS: usize = 0xFFFF;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Header {
    pub version: u32,
    pub previous: UInt256,
    pub merkle_root: UInt256,
    pub timestamp: u32,
    pub bits: u32,
    pub height: u32,
    pub nonce: u32,
}

impl Header {
    pub fn hash(&self) -> UInt256 {
        UInt256::from_array(hash256(&self.to_array()))
    }
}

impl Serializable for Header {
    fn size(&self) -> usize {
        4 + UInt256::LENGTH * 2 + 4 * 4
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.version);
        self.previous.serialize(writer);
        self.merkle_root.serialize(writer);
        writer.write_u32(self.timestamp);
        writer.write_u32(self.bits);
        writer.write_u32(self.height);
        writer.write_u32(self.nonce);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        Ok(Self {
            version: reader.read_u32()?,
            previous: UInt256::deserialize(reader)?,
            merkle_root: UInt256::deserialize(reader)?,
            timestamp: reader.read_u32()?,
            bits: reader.read_u32()?,
            height: reader.read_u32()?,
            nonce: reader.read_u32()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Block {
    pub header: Header,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// A block is identified by its header hash.
    pub fn hash(&self) -> UInt256 {
        self.header.hash()
    }
}

impl Serializable for Block {
    fn size(&self) -> usize {
        self.header.size() + helper::get_array_size(&self.transactions)
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        self.header.serialize(writer);
        helper::serialize_array(&self.transactions, writer);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        Ok(Self {
            header: Header::deserialize(reader)?,
            transactions: helper::deserialize_array(reader, MAX_BLOCK_TRANSACTIONS)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_hash_is_header_hash() {
        let header = Header {
            version: 1,
            previous: UInt256::zero(),
            merkle_root: UInt256::from_array([3; 32]),
            timestamp: 1_500_000_000,
            bits: 0x1d00ffff,
            height: 12,
            nonce: 99,
        };
        let block = Block {
            header: header.clone(),
            transactions: vec![Transaction::invoke(vec![0x61])],
        };
        assert_eq!(block.hash(), header.hash());
        assert_eq!(Block::from_array(&block.to_array()).unwrap(), block);
    }
}
