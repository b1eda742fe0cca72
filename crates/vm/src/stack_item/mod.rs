//! Values carried on the evaluation and alt stacks.

pub mod interop;
pub mod map;
pub mod serialization;
#[allow(clippy::module_inception)]
pub mod stack_item;
pub mod stack_item_type;

pub use interop::{InteropInterface, InteropIterator};
pub use map::StackMap;
pub use stack_item::{ArrayRef, MapRef, StackItem};
pub use stack_item_type::StackItemType;
