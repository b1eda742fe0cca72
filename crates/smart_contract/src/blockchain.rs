//! Read access to the ledger for syscall handlers.

use sidechain_core::{AccountState, AssetState, Block, Header, Output, Transaction, UInt168, UInt256};

use crate::error::{ContractError, ContractResult};

/// The chain as seen by contracts.
///
/// Handlers receive the ledger through this trait at registration time
/// rather than through a global, so a node passes its store and tests pass
/// a fake.
pub trait Blockchain {
    /// Height of the current tip.
    fn height(&self) -> u32;

    fn block_hash(&self, height: u32) -> Option<UInt256>;

    fn header(&self, hash: &UInt256) -> Option<Header>;

    fn block(&self, hash: &UInt256) -> Option<Block>;

    /// A confirmed transaction and the height of its block.
    fn transaction(&self, hash: &UInt256) -> Option<(Transaction, u32)>;

    fn account(&self, program_hash: &UInt168) -> Option<AccountState>;

    fn asset(&self, asset_id: &UInt256) -> Option<AssetState>;

    /// Outputs of `tx_id` not yet spent, or `None` for an unknown
    /// transaction.
    fn unspents(&self, tx_id: &UInt256) -> Option<Vec<Output>>;

    /// The outputs spent by `tx`, in input order.
    fn tx_references(&self, tx: &Transaction) -> ContractResult<Vec<Output>> {
        tx.inputs
            .iter()
            .map(|input| {
                let previous = &input.previous;
                let (referenced, _) = self
                    .transaction(&previous.tx_id)
                    .ok_or_else(|| ContractError::not_found("transaction", previous.tx_id))?;
                referenced
                    .outputs
                    .get(usize::from(previous.index))
                    .cloned()
                    .ok_or_else(|| {
                        ContractError::not_found(
                            "output",
                            format!("{}:{}", previous.tx_id, previous.index),
                        )
                    })
            })
            .collect()
    }
}

/// A chain with no blocks, used when scripts run detached from a node.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyChain;

impl Blockchain for EmptyChain {
    fn height(&self) -> u32 {
        0
    }

    fn block_hash(&self, _height: u32) -> Option<UInt256> {
        None
    }

    fn header(&self, _hash: &UInt256) -> Option<Header> {
        None
    }

    fn block(&self, _hash: &UInt256) -> Option<Block> {
        None
    }

    fn transaction(&self, _hash: &UInt256) -> Option<(Transaction, u32)> {
        None
    }

    fn account(&self, _program_hash: &UInt168) -> Option<AccountState> {
        None
    }

    fn asset(&self, _asset_id: &UInt256) -> Option<AssetState> {
        None
    }

    fn unspents(&self, _tx_id: &UInt256) -> Option<Vec<Output>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidechain_core::Input;

    #[test]
    fn references_of_unknown_inputs_fail() {
        let mut tx = Transaction::invoke(vec![0x51]);
        assert!(EmptyChain.tx_references(&tx).unwrap().is_empty());

        tx.inputs.push(Input::new(UInt256::zero(), 0));
        assert!(matches!(
            EmptyChain.tx_references(&tx),
            Err(ContractError::NotFound { kind: "transaction", .. })
        ));
    }
}
