// Copyright (C) 2024-2025 The Sidechain Developers.
//
// contract.rs file belongs to the sidechain-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use super::string_size;
use crate::hash::to_code_hash;
use crate::uint168::UInt168;
use sidechain_config::{MAX_CONTRACT_DESCRIPTION_SIZE, MAX_CONTRACT_FIELD_SIZE, MAX_CONTRACT_SIZE};
use sidechain_io::{helper, BinaryWriter, IoResult, MemoryReader, Serializable};

/// Deployed code plus its calling convention.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FunctionCode {
    pub code: Vec<u8>,
    pub parameter_types: Vec<u8>,
    pub return_type: u8,
}

impl FunctionCode {
    pub fn new(code: Vec<u8>, parameter_types: Vec<u8>, return_type: u8) -> Self {
        Self {
            code,
            parameter_types,
            return_type,
        }
    }

    pub fn code_hash(&self) -> UInt168 {
        to_code_hash(&self.code)
    }
}

impl Serializable for FunctionCode {
    fn size(&self) -> usize {
        1 + helper::get_var_bytes_size(self.parameter_types.len())
            + helper::get_var_bytes_size(self.code.len())
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.return_type);
        writer.write_var_bytes(&self.parameter_types);
        writer.write_var_bytes(&self.code);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let return_type = reader.read_u8()?;
        let parameter_types = reader.read_var_bytes(MAX_CONTRACT_FIELD_SIZE)?;
        let code = reader.read_var_bytes(MAX_CONTRACT_SIZE)?;
        Ok(Self {
            code,
            parameter_types,
            return_type,
        })
    }
}

/// A deployed contract, keyed by the code hash of its script.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContractState {
    pub code: FunctionCode,
    pub name: String,
    pub version: String,
    pub author: String,
    pub email: String,
    pub description: String,
}

impl ContractState {
    pub fn code_hash(&self) -> UInt168 {
        self.code.code_hash()
    }

    pub fn script(&self) -> &[u8] {
        &self.code.code
    }
}

impl Serializable for ContractState {
    fn size(&self) -> usize {
        1 + self.code.size()
            + string_size(&self.name)
            + string_size(&self.version)
            + string_size(&self.author)
            + string_size(&self.email)
            + string_size(&self.description)
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        super::write_version(writer);
        self.code.serialize(writer);
        writer.write_var_string(&self.name);
        writer.write_var_string(&self.version);
        writer.write_var_string(&self.author);
        writer.write_var_string(&self.email);
        writer.write_var_string(&self.description);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        super::read_version(reader)?;
        Ok(Self {
            code: FunctionCode::deserialize(reader)?,
            name: reader.read_var_string(MAX_CONTRACT_FIELD_SIZE)?,
            version: reader.read_var_string(MAX_CONTRACT_FIELD_SIZE)?,
            author: reader.read_var_string(MAX_CONTRACT_FIELD_SIZE)?,
            email: reader.read_var_string(MAX_CONTRACT_FIELD_SIZE)?,
            description: reader.read_var_string(MAX_CONTRACT_DESCRIPTION_SIZE)?,
        })
    }
}
