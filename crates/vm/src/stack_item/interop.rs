//! Host objects a script can hold on its stacks.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use sidechain_core::{
    AccountState, AssetState, Attribute, Block, ContractState, Header, Input, Output,
    StorageContext, Transaction,
};
use sidechain_io::SerializableExt;

use super::stack_item::StackItem;

/// A cursor over host data, advanced by `Neo.Iterator.Next`.
pub trait InteropIterator {
    /// Advances; returns false once exhausted.
    fn next(&mut self) -> bool;

    /// Current key, or `None` before the first `next` or after the end.
    fn key(&self) -> Option<StackItem>;

    /// Current value, or `None` before the first `next` or after the end.
    fn value(&self) -> Option<StackItem>;
}

/// Closed set of host objects carried by `StackItem::Interop`.
///
/// Equality is identity: two handles are equal only when they wrap the same
/// host allocation.
#[derive(Clone)]
pub enum InteropInterface {
    Header(Rc<Header>),
    Block(Rc<Block>),
    Transaction(Rc<Transaction>),
    Attribute(Rc<Attribute>),
    Input(Rc<Input>),
    Output(Rc<Output>),
    Account(Rc<AccountState>),
    Asset(Rc<AssetState>),
    Contract(Rc<ContractState>),
    StorageContext(Rc<StorageContext>),
    Iterator(Rc<RefCell<dyn InteropIterator>>),
}

impl InteropInterface {
    pub fn iterator<I: InteropIterator + 'static>(iterator: I) -> Self {
        InteropInterface::Iterator(Rc::new(RefCell::new(iterator)))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InteropInterface::Header(_) => "Header",
            InteropInterface::Block(_) => "Block",
            InteropInterface::Transaction(_) => "Transaction",
            InteropInterface::Attribute(_) => "Attribute",
            InteropInterface::Input(_) => "Input",
            InteropInterface::Output(_) => "Output",
            InteropInterface::Account(_) => "Account",
            InteropInterface::Asset(_) => "Asset",
            InteropInterface::Contract(_) => "Contract",
            InteropInterface::StorageContext(_) => "StorageContext",
            InteropInterface::Iterator(_) => "Iterator",
        }
    }

    /// Byte form of the wrapped object: its wire encoding, the code hash for
    /// a storage context, nothing for an iterator.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            InteropInterface::Header(header) => header.to_array(),
            InteropInterface::Block(block) => block.to_array(),
            InteropInterface::Transaction(tx) => tx.to_array(),
            InteropInterface::Attribute(attr) => attr.to_array(),
            InteropInterface::Input(input) => input.to_array(),
            InteropInterface::Output(output) => output.to_array(),
            InteropInterface::Account(account) => account.to_array(),
            InteropInterface::Asset(asset) => asset.to_array(),
            InteropInterface::Contract(contract) => contract.to_array(),
            InteropInterface::StorageContext(context) => context.code_hash.to_vec(),
            InteropInterface::Iterator(_) => Vec::new(),
        }
    }

    pub fn same_object(&self, other: &InteropInterface) -> bool {
        match (self, other) {
            (InteropInterface::Header(a), InteropInterface::Header(b)) => Rc::ptr_eq(a, b),
            (InteropInterface::Block(a), InteropInterface::Block(b)) => Rc::ptr_eq(a, b),
            (InteropInterface::Transaction(a), InteropInterface::Transaction(b)) => Rc::ptr_eq(a, b),
            (InteropInterface::Attribute(a), InteropInterface::Attribute(b)) => Rc::ptr_eq(a, b),
            (InteropInterface::Input(a), InteropInterface::Input(b)) => Rc::ptr_eq(a, b),
            (InteropInterface::Output(a), InteropInterface::Output(b)) => Rc::ptr_eq(a, b),
            (InteropInterface::Account(a), InteropInterface::Account(b)) => Rc::ptr_eq(a, b),
            (InteropInterface::Asset(a), InteropInterface::Asset(b)) => Rc::ptr_eq(a, b),
            (InteropInterface::Contract(a), InteropInterface::Contract(b)) => Rc::ptr_eq(a, b),
            (InteropInterface::StorageContext(a), InteropInterface::StorageContext(b)) => {
                Rc::ptr_eq(a, b)
            }
            (InteropInterface::Iterator(a), InteropInterface::Iterator(b)) => {
                Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }
}

impl fmt::Debug for InteropInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

macro_rules! interop_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for InteropInterface {
                fn from(value: $ty) -> Self {
                    InteropInterface::$variant(Rc::new(value))
                }
            }

            impl From<Rc<$ty>> for InteropInterface {
                fn from(value: Rc<$ty>) -> Self {
                    InteropInterface::$variant(value)
                }
            }
        )*
    };
}

interop_from! {
    Header => Header,
    Block => Block,
    Transaction => Transaction,
    Attribute => Attribute,
    Input => Input,
    Output => Output,
    Account => AccountState,
    Asset => AssetState,
    Contract => ContractState,
    StorageContext => StorageContext,
}
