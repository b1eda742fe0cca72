// Copyright (C) 2024-2025 The Sidechain Developers.
//
// hash.rs file belongs to the sidechain-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Hash primitives and program-hash derivation.

use crate::uint168::UInt168;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

const CHECKSIG: u8 = 0xAC;
const CHECKMULTISIG: u8 = 0xAE;
const CROSSCHAIN: u8 = 0xAF;

/// Prefix byte of a program hash, identifying the kind of program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProgramPrefix {
    /// Single-signature redeem script.
    Standard = 0x21,
    /// Multi-signature redeem script.
    MultiSig = 0x12,
    /// Cross-chain redeem script.
    CrossChain = 0x4B,
    /// Identification registration script.
    RegisterId = 0x67,
    /// Deployed contract code.
    SmartContract = 0x1C,
}

impl ProgramPrefix {
    /// Picks the prefix from the script's final opcode.
    pub fn for_script(script: &[u8]) -> Self {
        match script.last() {
            Some(&CHECKSIG) => Self::Standard,
            Some(&CHECKMULTISIG) => Self::MultiSig,
            Some(&CROSSCHAIN) => Self::CrossChain,
            _ => Self::SmartContract,
        }
    }
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Double SHA-256.
pub fn hash256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

/// RIPEMD-160 of SHA-256.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

fn prefixed(prefix: ProgramPrefix, script: &[u8]) -> UInt168 {
    let mut bytes = [0u8; UInt168::LENGTH];
    bytes[0] = prefix as u8;
    bytes[1..].copy_from_slice(&hash160(script));
    UInt168::from_array(bytes)
}

/// Identity of deployed contract code; also the key of its contract state.
pub fn to_code_hash(code: &[u8]) -> UInt168 {
    prefixed(ProgramPrefix::SmartContract, code)
}

/// Program hash of a redeem script, prefixed by the script kind.
pub fn to_program_hash(script: &[u8]) -> UInt168 {
    prefixed(ProgramPrefix::for_script(script), script)
}

/// `PUSHBYTES33 <key> CHECKSIG` for a compressed public key.
pub fn create_signature_redeem_script(public_key: &[u8]) -> Vec<u8> {
    let mut script = Vec::with_capacity(public_key.len() + 2);
    script.push(public_key.len() as u8);
    script.extend_from_slice(public_key);
    script.push(CHECKSIG);
    script
}
