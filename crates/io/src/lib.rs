//! Binary IO for sidechain data structures.
//!
//! Little-endian fixed-width integers, the Bitcoin-style variable-length
//! integer prefix, and the [`Serializable`] trait implemented by every type
//! that is hashed, stored, or pushed through the contract engine.

mod binary_writer;
mod error;
mod memory_reader;
pub mod serializable;

pub use binary_writer::BinaryWriter;
pub use error::{IoError, IoResult};
pub use memory_reader::MemoryReader;
pub use serializable::{helper, Serializable, SerializableExt};
