use sidechain_core::StateKind;

use crate::error::StorageError;

/// One-byte namespace prepended to every persistent key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum DataEntryPrefix {
    DataBlockHash = 0x00,
    DataHeader = 0x01,
    DataTransaction = 0x02,
    SysCurrentBlock = 0x40,
    IxHeaderHashList = 0x80,
    IxUnspent = 0x90,
    IxUnspentUtxo = 0x91,
    IxSideChainTx = 0x92,
    IxMainChainTx = 0x93,
    StInfo = 0xc0,
    StContract = 0xc2,
    StStorage = 0xc3,
    StAccount = 0xc4,
    StAssetState = 0xc5,
    CfgVersion = 0xf0,
}

impl DataEntryPrefix {
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// The ledger state stored under this prefix, if any.
    pub fn state_kind(self) -> Option<StateKind> {
        match self {
            DataEntryPrefix::StContract => Some(StateKind::Contract),
            DataEntryPrefix::StStorage => Some(StateKind::Storage),
            DataEntryPrefix::StAccount => Some(StateKind::Account),
            DataEntryPrefix::StAssetState => Some(StateKind::Asset),
            _ => None,
        }
    }

    /// `prefix || key`, the persistent-store key.
    pub fn full_key(self, key: &[u8]) -> Vec<u8> {
        let mut full = Vec::with_capacity(key.len() + 1);
        full.push(self.as_byte());
        full.extend_from_slice(key);
        full
    }
}

impl TryFrom<u8> for DataEntryPrefix {
    type Error = StorageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => Self::DataBlockHash,
            0x01 => Self::DataHeader,
            0x02 => Self::DataTransaction,
            0x40 => Self::SysCurrentBlock,
            0x80 => Self::IxHeaderHashList,
            0x90 => Self::IxUnspent,
            0x91 => Self::IxUnspentUtxo,
            0x92 => Self::IxSideChainTx,
            0x93 => Self::IxMainChainTx,
            0xc0 => Self::StInfo,
            0xc2 => Self::StContract,
            0xc3 => Self::StStorage,
            0xc4 => Self::StAccount,
            0xc5 => Self::StAssetState,
            0xf0 => Self::CfgVersion,
            prefix => return Err(StorageError::UnsupportedPrefix { prefix }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_values_round_trip() {
        for prefix in [
            DataEntryPrefix::DataBlockHash,
            DataEntryPrefix::IxUnspentUtxo,
            DataEntryPrefix::StContract,
            DataEntryPrefix::StAssetState,
            DataEntryPrefix::CfgVersion,
        ] {
            assert_eq!(DataEntryPrefix::try_from(prefix.as_byte()).unwrap(), prefix);
        }
        assert!(DataEntryPrefix::try_from(0xc1).is_err());
    }

    #[test]
    fn full_key_prepends_prefix() {
        assert_eq!(DataEntryPrefix::StStorage.full_key(b"ab"), vec![0xc3, b'a', b'b']);
        assert_eq!(DataEntryPrefix::StStorage.state_kind(), Some(StateKind::Storage));
        assert_eq!(DataEntryPrefix::DataHeader.state_kind(), None);
    }
}
