//! Witness checks: which program hashes a transaction proves it controls.

use std::collections::BTreeSet;

use p256::PublicKey;
use sidechain_config::{ADDRESS_SIZE, COMPRESSED_PUBLIC_KEY_SIZE, PROGRAM_HASH_SIZE};
use sidechain_core::{
    create_signature_redeem_script, to_program_hash, AttributeUsage, ProgramPrefix, Transaction,
    UInt168,
};

use crate::blockchain::Blockchain;
use crate::error::{ContractError, ContractResult};

/// Program hashes `tx` carries witnesses for: the owners of the outputs it
/// spends plus every `Script` attribute. Sorted and free of duplicates.
pub fn tx_program_hashes(chain: &dyn Blockchain, tx: &Transaction) -> ContractResult<Vec<UInt168>> {
    let mut hashes: BTreeSet<UInt168> = chain
        .tx_references(tx)?
        .into_iter()
        .map(|output| output.program_hash)
        .collect();
    for attribute in tx.attributes.iter().filter(|a| a.usage == AttributeUsage::Script) {
        hashes.insert(UInt168::from_bytes(&attribute.data)?);
    }
    Ok(hashes.into_iter().collect())
}

/// Program hash of the single-signature redeem script of a compressed
/// secp256r1 public key.
pub fn public_key_program_hash(public_key: &[u8]) -> ContractResult<UInt168> {
    if public_key.len() != COMPRESSED_PUBLIC_KEY_SIZE {
        return Err(ContractError::invalid_argument(
            "public key",
            format!("expected {COMPRESSED_PUBLIC_KEY_SIZE} bytes, got {}", public_key.len()),
        ));
    }
    PublicKey::from_sec1_bytes(public_key)
        .map_err(|_| ContractError::invalid_argument("public key", "not a curve point"))?;
    Ok(to_program_hash(&create_signature_redeem_script(public_key)))
}

/// Reads the operand of `Runtime.CheckWitness`: a 21-byte program hash, a
/// 20-byte script hash of a standard account, or a compressed public key.
pub fn witness_target(data: &[u8]) -> ContractResult<UInt168> {
    match data.len() {
        PROGRAM_HASH_SIZE => Ok(UInt168::from_bytes(data)?),
        ADDRESS_SIZE => Ok(UInt168::from_script_hash(ProgramPrefix::Standard as u8, data)?),
        COMPRESSED_PUBLIC_KEY_SIZE => public_key_program_hash(data),
        other => Err(ContractError::invalid_argument(
            "witness operand",
            format!("unsupported length {other}"),
        )),
    }
}

pub fn check_witness(
    chain: &dyn Blockchain,
    tx: &Transaction,
    program_hash: &UInt168,
) -> ContractResult<bool> {
    Ok(tx_program_hashes(chain, tx)?.binary_search(program_hash).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::EmptyChain;
    use sidechain_core::Attribute;

    fn hash(byte: u8) -> UInt168 {
        UInt168::from_array([byte; PROGRAM_HASH_SIZE])
    }

    #[test]
    fn script_attributes_are_sorted_and_deduplicated() {
        let mut tx = Transaction::invoke(vec![0x51]);
        for byte in [9, 3, 9] {
            tx.attributes.push(Attribute::new(AttributeUsage::Script, hash(byte).to_vec()));
        }
        tx.attributes.push(Attribute::new(AttributeUsage::Memo, vec![1, 2, 3]));

        let hashes = tx_program_hashes(&EmptyChain, &tx).unwrap();
        assert_eq!(hashes, vec![hash(3), hash(9)]);
        assert!(check_witness(&EmptyChain, &tx, &hash(9)).unwrap());
        assert!(!check_witness(&EmptyChain, &tx, &hash(4)).unwrap());
    }

    #[test]
    fn malformed_script_attribute_is_an_error() {
        let mut tx = Transaction::invoke(vec![0x51]);
        tx.attributes.push(Attribute::new(AttributeUsage::Script, vec![1; 20]));
        assert!(tx_program_hashes(&EmptyChain, &tx).is_err());
    }

    #[test]
    fn short_hash_widens_to_standard_prefix() {
        let target = witness_target(&[7u8; 20]).unwrap();
        assert_eq!(target.prefix(), 0x21);
        assert_eq!(&target.as_bytes()[1..], &[7u8; 20]);
        assert!(witness_target(&[0u8; 19]).is_err());
    }

    #[test]
    fn public_key_must_be_a_point() {
        let mut key = [0u8; 33];
        key[0] = 0x05;
        assert!(public_key_program_hash(&key).is_err());
    }
}
