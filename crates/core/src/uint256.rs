// Copyright (C) 2024-2025 The Sidechain Developers.
//
// uint256.rs file belongs to the sidechain-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Implementation of `UInt256`, the 32-byte hash used for blocks, transactions and assets.

use crate::error::{CoreError, CoreResult};
use sidechain_config::HASH_SIZE;
use sidechain_io::{BinaryWriter, IoResult, MemoryReader, Serializable};
use std::fmt;
use std::str::FromStr;

/// A 256-bit hash stored in little-endian byte order.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct UInt256([u8; HASH_SIZE]);

impl UInt256 {
    pub const LENGTH: usize = HASH_SIZE;

    pub const fn zero() -> Self {
        Self([0u8; HASH_SIZE])
    }

    pub const fn from_array(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates a hash from exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        let array: [u8; HASH_SIZE] = bytes
            .try_into()
            .map_err(|_| CoreError::invalid_length("UInt256", HASH_SIZE, bytes.len()))?;
        Ok(Self(array))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|byte| *byte == 0)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl Serializable for UInt256 {
    fn size(&self) -> usize {
        HASH_SIZE
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_bytes(&self.0);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let bytes = reader.read_bytes(HASH_SIZE)?;
        Ok(Self::from_bytes(&bytes)?)
    }
}

/// Hashes display big-endian, the way explorers print them.
impl fmt::Display for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&hex::encode(reversed))
    }
}

impl fmt::Debug for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt256({self})")
    }
}

impl FromStr for UInt256 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = hex::decode(s).map_err(|err| CoreError::InvalidHex(err.to_string()))?;
        bytes.reverse();
        Self::from_bytes(&bytes)
    }
}

impl From<[u8; HASH_SIZE]> for UInt256 {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}
