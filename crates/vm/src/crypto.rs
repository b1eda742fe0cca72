//! Hashing and signature verification used by the crypto opcodes.

use p256::ecdsa::{signature::Verifier, Signature, VerifyingKey};
use sha1::{Digest, Sha1};

/// Crypto primitives the engine delegates to.
pub trait Crypto {
    /// RIPEMD160(SHA256(data)).
    fn hash160(&self, data: &[u8]) -> Vec<u8>;

    /// SHA256(SHA256(data)).
    fn hash256(&self, data: &[u8]) -> Vec<u8>;

    /// Checks a 64-byte `r || s` signature of `message` against a SEC1
    /// encoded public key. Malformed keys or signatures verify as false.
    fn verify_signature(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> bool;
}

/// secp256r1 (P-256) verification with SHA-256 digests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256r1Crypto;

impl Crypto for Secp256r1Crypto {
    fn hash160(&self, data: &[u8]) -> Vec<u8> {
        sidechain_core::hash160(data).to_vec()
    }

    fn hash256(&self, data: &[u8]) -> Vec<u8> {
        sidechain_core::hash256(data).to_vec()
    }

    fn verify_signature(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::from_sec1_bytes(public_key) else {
            log::trace!("rejecting malformed public key of {} bytes", public_key.len());
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        key.verify(message, &signature).is_ok()
    }
}

pub fn sha1(data: &[u8]) -> Vec<u8> {
    Sha1::digest(data).to_vec()
}

pub fn sha256(data: &[u8]) -> Vec<u8> {
    sidechain_core::sha256(data).to_vec()
}
