// Copyright (C) 2024-2025 The Sidechain Developers.
//
// transaction.rs file belongs to the sidechain-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Transactions as handed to the engine by the ledger.

use crate::error::CoreError;
use crate::fixed64::Fixed64;
use crate::hash::hash256;
use crate::uint168::UInt168;
use crate::uint256::UInt256;
use sidechain_config::MAX_SCRIPT_SIZE;
use sidechain_io::{
    helper, BinaryWriter, IoError, IoResult, MemoryReader, Serializable, SerializableExt,
};

const MAX_ATTRIBUTE_DATA: usize = 65535;
const MAX_TX_ITEMS: usize = 0xFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum TransactionType {
    CoinBase = 0x00,
    RegisterAsset = 0x01,
    TransferAsset = 0x02,
    Record = 0x03,
    Deploy = 0x04,
    SideChainPow = 0x05,
    RechargeToSideChain = 0x06,
    WithdrawFromSideChain = 0x07,
    TransferCrossChainAsset = 0x08,
    Invoke = 0xF0,
}

impl TryFrom<u8> for TransactionType {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => Self::CoinBase,
            0x01 => Self::RegisterAsset,
            0x02 => Self::TransferAsset,
            0x03 => Self::Record,
            0x04 => Self::Deploy,
            0x05 => Self::SideChainPow,
            0x06 => Self::RechargeToSideChain,
            0x07 => Self::WithdrawFromSideChain,
            0x08 => Self::TransferCrossChainAsset,
            0xF0 => Self::Invoke,
            other => {
                return Err(CoreError::UnknownVariant {
                    kind: "transaction type",
                    value: other,
                })
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum AttributeUsage {
    Nonce = 0x00,
    /// Data is a program hash whose witness the transaction must carry.
    Script = 0x20,
    DescriptionUrl = 0x81,
    Description = 0x90,
    Memo = 0x91,
    Confirmations = 0x92,
}

impl TryFrom<u8> for AttributeUsage {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => Self::Nonce,
            0x20 => Self::Script,
            0x81 => Self::DescriptionUrl,
            0x90 => Self::Description,
            0x91 => Self::Memo,
            0x92 => Self::Confirmations,
            other => {
                return Err(CoreError::UnknownVariant {
                    kind: "attribute usage",
                    value: other,
                })
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Attribute {
    pub usage: AttributeUsage,
    pub data: Vec<u8>,
}

impl Attribute {
    pub fn new(usage: AttributeUsage, data: Vec<u8>) -> Self {
        Self { usage, data }
    }
}

impl Serializable for Attribute {
    fn size(&self) -> usize {
        1 + helper::get_var_bytes_size(self.data.len())
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.usage as u8);
        writer.write_var_bytes(&self.data);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let usage = AttributeUsage::try_from(reader.read_u8()?)?;
        let data = reader.read_var_bytes(MAX_ATTRIBUTE_DATA)?;
        Ok(Self { usage, data })
    }
}

/// Reference to an output of an earlier transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct OutPoint {
    pub tx_id: UInt256,
    pub index: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Input {
    pub previous: OutPoint,
    pub sequence: u32,
}

impl Input {
    pub fn new(tx_id: UInt256, index: u16) -> Self {
        Self {
            previous: OutPoint { tx_id, index },
            sequence: u32::MAX,
        }
    }
}

impl Serializable for Input {
    fn size(&self) -> usize {
        UInt256::LENGTH + 2 + 4
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        self.previous.tx_id.serialize(writer);
        writer.write_u16(self.previous.index);
        writer.write_u32(self.sequence);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let tx_id = UInt256::deserialize(reader)?;
        let index = reader.read_u16()?;
        let sequence = reader.read_u32()?;
        Ok(Self {
            previous: OutPoint { tx_id, index },
            sequence,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Output {
    pub asset_id: UInt256,
    pub value: Fixed64,
    pub output_lock: u32,
    pub program_hash: UInt168,
}

impl Serializable for Output {
    fn size(&self) -> usize {
        UInt256::LENGTH + 8 + 4 + UInt168::LENGTH
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        self.asset_id.serialize(writer);
        self.value.serialize(writer);
        writer.write_u32(self.output_lock);
        self.program_hash.serialize(writer);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        Ok(Self {
            asset_id: UInt256::deserialize(reader)?,
            value: Fixed64::deserialize(reader)?,
            output_lock: reader.read_u32()?,
            program_hash: UInt168::deserialize(reader)?,
        })
    }
}

/// Payload of an invocation transaction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PayloadInvoke {
    pub code_hash: UInt168,
    pub code: Vec<u8>,
    pub program_hash: UInt168,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Payload {
    Invoke(PayloadInvoke),
    /// Payloads the engine never inspects, kept as their encoded bytes.
    Opaque(Vec<u8>),
}

impl Payload {
    fn size(&self) -> usize {
        match self {
            Payload::Invoke(invoke) => {
                UInt168::LENGTH * 2 + helper::get_var_bytes_size(invoke.code.len())
            }
            Payload::Opaque(bytes) => helper::get_var_bytes_size(bytes.len()),
        }
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        match self {
            Payload::Invoke(invoke) => {
                invoke.code_hash.serialize(writer);
                writer.write_var_bytes(&invoke.code);
                invoke.program_hash.serialize(writer);
            }
            Payload::Opaque(bytes) => writer.write_var_bytes(bytes),
        }
    }

    fn deserialize(tx_type: TransactionType, reader: &mut MemoryReader) -> IoResult<Self> {
        match tx_type {
            TransactionType::Invoke => Ok(Payload::Invoke(PayloadInvoke {
                code_hash: UInt168::deserialize(reader)?,
                code: reader.read_var_bytes(MAX_SCRIPT_SIZE)?,
                program_hash: UInt168::deserialize(reader)?,
            })),
            _ => Ok(Payload::Opaque(reader.read_var_bytes(MAX_SCRIPT_SIZE)?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    pub tx_type: TransactionType,
    pub payload_version: u8,
    pub payload: Payload,
    pub attributes: Vec<Attribute>,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub lock_time: u32,
}

impl Transaction {
    /// An invocation transaction carrying `code`.
    pub fn invoke(code: Vec<u8>) -> Self {
        let code_hash = crate::hash::to_code_hash(&code);
        Self {
            tx_type: TransactionType::Invoke,
            payload_version: 0,
            payload: Payload::Invoke(PayloadInvoke {
                code_hash,
                code,
                program_hash: UInt168::zero(),
            }),
            attributes: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    /// Unsigned encoding; this is what signatures and the hash cover.
    pub fn sign_data(&self) -> Vec<u8> {
        self.to_array()
    }

    pub fn hash(&self) -> UInt256 {
        UInt256::from_array(hash256(&self.sign_data()))
    }

    /// Invocation script, for invoke transactions.
    pub fn invoke_code(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Invoke(invoke) if self.tx_type == TransactionType::Invoke => {
                Some(&invoke.code)
            }
            _ => None,
        }
    }
}

impl Serializable for Transaction {
    fn size(&self) -> usize {
        2 + self.payload.size()
            + helper::get_array_size(&self.attributes)
            + helper::get_array_size(&self.inputs)
            + helper::get_array_size(&self.outputs)
            + 4
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.tx_type as u8);
        writer.write_u8(self.payload_version);
        self.payload.serialize(writer);
        helper::serialize_array(&self.attributes, writer);
        helper::serialize_array(&self.inputs, writer);
        helper::serialize_array(&self.outputs, writer);
        writer.write_u32(self.lock_time);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let tx_type = TransactionType::try_from(reader.read_u8()?).map_err(IoError::from)?;
        let payload_version = reader.read_u8()?;
        let payload = Payload::deserialize(tx_type, reader)?;
        Ok(Self {
            tx_type,
            payload_version,
            payload,
            attributes: helper::deserialize_array(reader, MAX_TX_ITEMS)?,
            inputs: helper::deserialize_array(reader, MAX_TX_ITEMS)?,
            outputs: helper::deserialize_array(reader, MAX_TX_ITEMS)?,
            lock_time: reader.read_u32()?,
        })
    }
}
