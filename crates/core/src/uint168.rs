// Copyright (C) 2024-2025 The Sidechain Developers.
//
// uint168.rs file belongs to the sidechain-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Implementation of `UInt168`, the 21-byte program hash.
//!
//! The first byte is a prefix identifying the kind of program (standard
//! signature, multi-signature, smart contract); the remaining 20 bytes are the
//! RIPEMD-160 of the SHA-256 of the program script.

use crate::error::{CoreError, CoreResult};
use sidechain_config::{ADDRESS_SIZE, PROGRAM_HASH_SIZE};
use sidechain_io::{BinaryWriter, IoResult, MemoryReader, Serializable};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct UInt168([u8; PROGRAM_HASH_SIZE]);

impl UInt168 {
    pub const LENGTH: usize = PROGRAM_HASH_SIZE;

    pub const fn zero() -> Self {
        Self([0u8; PROGRAM_HASH_SIZE])
    }

    pub const fn from_array(bytes: [u8; PROGRAM_HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates a program hash from exactly 21 bytes.
    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        let array: [u8; PROGRAM_HASH_SIZE] = bytes
            .try_into()
            .map_err(|_| CoreError::invalid_length("UInt168", PROGRAM_HASH_SIZE, bytes.len()))?;
        Ok(Self(array))
    }

    /// Widens a 20-byte script hash with an explicit prefix byte.
    pub fn from_script_hash(prefix: u8, hash: &[u8]) -> CoreResult<Self> {
        if hash.len() != ADDRESS_SIZE {
            return Err(CoreError::invalid_length("script hash", ADDRESS_SIZE, hash.len()));
        }
        let mut array = [0u8; PROGRAM_HASH_SIZE];
        array[0] = prefix;
        array[1..].copy_from_slice(hash);
        Ok(Self(array))
    }

    pub fn prefix(&self) -> u8 {
        self.0[0]
    }

    pub fn as_bytes(&self) -> &[u8; PROGRAM_HASH_SIZE] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|byte| *byte == 0)
    }
}

impl Serializable for UInt168 {
    fn size(&self) -> usize {
        PROGRAM_HASH_SIZE
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_bytes(&self.0);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let bytes = reader.read_bytes(PROGRAM_HASH_SIZE)?;
        Ok(Self::from_bytes(&bytes)?)
    }
}

impl fmt::Display for UInt168 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for UInt168 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt168({self})")
    }
}

impl FromStr for UInt168 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|err| CoreError::InvalidHex(err.to_string()))?;
        Self::from_bytes(&bytes)
    }
}
