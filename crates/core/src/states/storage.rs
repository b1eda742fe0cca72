// Copyright (C) 2024-2025 The Sidechain Developers.
//
// storage.rs file belongs to the sidechain-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::uint168::UInt168;
use sidechain_config::MAX_STORAGE_KEY_SIZE;
use sidechain_io::{helper, BinaryWriter, IoResult, MemoryReader, Serializable};

const MAX_STORAGE_VALUE_SIZE: usize = 1024 * 1024;

/// A contract storage entry value.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StorageItem {
    pub value: Vec<u8>,
}

impl StorageItem {
    pub fn new(value: Vec<u8>) -> Self {
        Self { value }
    }
}

impl Serializable for StorageItem {
    fn size(&self) -> usize {
        1 + helper::get_var_bytes_size(self.value.len())
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        super::write_version(writer);
        writer.write_var_bytes(&self.value);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        super::read_version(reader)?;
        Ok(Self {
            value: reader.read_var_bytes(MAX_STORAGE_VALUE_SIZE)?,
        })
    }
}

/// Key of a contract storage entry: the owning contract and the raw key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct StorageKey {
    pub code_hash: UInt168,
    pub key: Vec<u8>,
}

impl StorageKey {
    pub fn new(code_hash: UInt168, key: Vec<u8>) -> Self {
        Self { code_hash, key }
    }
}

impl Serializable for StorageKey {
    fn size(&self) -> usize {
        UInt168::LENGTH + helper::get_var_bytes_size(self.key.len())
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        self.code_hash.serialize(writer);
        writer.write_var_bytes(&self.key);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        Ok(Self {
            code_hash: UInt168::deserialize(reader)?,
            key: reader.read_var_bytes(MAX_STORAGE_KEY_SIZE)?,
        })
    }
}

/// Capability scoping storage syscalls to one contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageContext {
    pub code_hash: UInt168,
    pub is_read_only: bool,
}

impl StorageContext {
    pub fn new(code_hash: UInt168) -> Self {
        Self {
            code_hash,
            is_read_only: false,
        }
    }

    pub fn read_only(code_hash: UInt168) -> Self {
        Self {
            code_hash,
            is_read_only: true,
        }
    }

    pub fn as_read_only(&self) -> Self {
        Self::read_only(self.code_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidechain_io::SerializableExt;

    #[test]
    fn storage_key_layout_is_hash_then_var_bytes() {
        let key = StorageKey::new(UInt168::from_array([0x1C; 21]), b"abc".to_vec());
        let bytes = key.to_array();
        assert_eq!(&bytes[..21], &[0x1C; 21]);
        assert_eq!(bytes[21], 3);
        assert_eq!(&bytes[22..], b"abc");
        assert_eq!(bytes.len(), key.size());
    }

    #[test]
    fn read_only_copy_keeps_contract() {
        let context = StorageContext::new(UInt168::from_array([1; 21]));
        let read_only = context.as_read_only();
        assert!(read_only.is_read_only);
        assert_eq!(read_only.code_hash, context.code_hash);
    }
}
