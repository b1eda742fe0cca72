//! # Sidechain Smart Contract
//!
//! The syscall surface contracts see and the engine that runs them.
//!
//! - [`StateReader`] registers the read-only syscalls: runtime queries,
//!   chain lookups, accessors on headers, blocks, transactions and ledger
//!   states, storage contexts and iterators.
//! - [`StateMachine`] adds the syscalls that write: asset registration and
//!   renewal, contract deployment and destruction, contract storage. Its
//!   writes go to a [`DataCache`](sidechain_persistence::DataCache).
//! - [`ApplicationEngine`] runs a script with both, committing its writes
//!   when the script halts and discarding them when it faults.
//!
//! Chain data the ledger owns is read through the [`Blockchain`] trait.

pub mod application_engine;
mod args;
pub mod blockchain;
pub mod code_table;
pub mod error;
pub mod events;
pub mod iterators;
pub mod state_machine;
pub mod state_reader;
pub mod witness;

pub use application_engine::ApplicationEngine;
pub use blockchain::{Blockchain, EmptyChain};
pub use code_table::CacheCodeTable;
pub use error::{ContractError, ContractResult};
pub use events::{EventRecorder, LogEvent, NotifyEvent};
pub use iterators::{KeysIterator, SharedIterator, StorageIterator, ValuesIterator};
pub use state_machine::StateMachine;
pub use state_reader::StateReader;
pub use witness::{check_witness, tx_program_hashes};
