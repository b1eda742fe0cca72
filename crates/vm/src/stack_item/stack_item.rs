//! The stack value model.
//!
//! Compound values are reference types: two stack slots holding the same
//! array observe each other's `SETITEM`/`APPEND`. Scripts can therefore build
//! cycles, so equality and debug printing never recurse blindly.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{One, Zero};

use super::interop::InteropInterface;
use super::map::StackMap;
use super::stack_item_type::StackItemType;

/// Shared, mutable element list of an `Array` or `Struct`.
pub type ArrayRef = Rc<RefCell<Vec<StackItem>>>;

/// Shared, mutable `Map` body.
pub type MapRef = Rc<RefCell<StackMap>>;

/// A value on the evaluation or alt stack.
#[derive(Clone)]
pub enum StackItem {
    Boolean(bool),
    Integer(BigInt),
    ByteArray(Vec<u8>),
    Array(ArrayRef),
    /// Array-like, but copied by value when stored into another compound.
    Struct(ArrayRef),
    Map(MapRef),
    Interop(InteropInterface),
}

impl StackItem {
    pub fn from_bool(value: bool) -> Self {
        StackItem::Boolean(value)
    }

    pub fn from_int<T: Into<BigInt>>(value: T) -> Self {
        StackItem::Integer(value.into())
    }

    pub fn from_bytes<T: Into<Vec<u8>>>(value: T) -> Self {
        StackItem::ByteArray(value.into())
    }

    pub fn new_array(items: Vec<StackItem>) -> Self {
        StackItem::Array(Rc::new(RefCell::new(items)))
    }

    pub fn new_struct(items: Vec<StackItem>) -> Self {
        StackItem::Struct(Rc::new(RefCell::new(items)))
    }

    pub fn new_map() -> Self {
        StackItem::Map(Rc::new(RefCell::new(StackMap::new())))
    }

    pub fn from_map(map: StackMap) -> Self {
        StackItem::Map(Rc::new(RefCell::new(map)))
    }

    pub fn from_interop<T: Into<InteropInterface>>(value: T) -> Self {
        StackItem::Interop(value.into())
    }

    pub fn item_type(&self) -> StackItemType {
        match self {
            StackItem::Boolean(_) => StackItemType::Boolean,
            StackItem::Integer(_) => StackItemType::Integer,
            StackItem::ByteArray(_) => StackItemType::ByteArray,
            StackItem::Array(_) => StackItemType::Array,
            StackItem::Struct(_) => StackItemType::Struct,
            StackItem::Map(_) => StackItemType::Map,
            StackItem::Interop(_) => StackItemType::InteropInterface,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.item_type().name()
    }

    /// Boolean coercion. Byte arrays are true when any byte is nonzero;
    /// arrays are always true and maps always false.
    pub fn as_bool(&self) -> bool {
        match self {
            StackItem::Boolean(value) => *value,
            StackItem::Integer(value) => !value.is_zero(),
            StackItem::ByteArray(bytes) => bytes.iter().any(|&b| b != 0),
            StackItem::Array(_) | StackItem::Struct(_) => true,
            StackItem::Map(_) => false,
            StackItem::Interop(_) => true,
        }
    }

    /// Integer coercion. Byte arrays decode as signed little-endian; values
    /// with no integer reading coerce to zero.
    pub fn as_int(&self) -> BigInt {
        match self {
            StackItem::Boolean(value) => {
                if *value {
                    BigInt::one()
                } else {
                    BigInt::zero()
                }
            }
            StackItem::Integer(value) => value.clone(),
            StackItem::ByteArray(bytes) => bytes_to_int(bytes),
            _ => BigInt::zero(),
        }
    }

    /// Byte coercion. Integers encode as minimal signed little-endian, with
    /// zero as the empty array. Interop handles expose their host bytes.
    pub fn as_bytes(&self) -> Vec<u8> {
        match self {
            StackItem::Boolean(value) => vec![u8::from(*value)],
            StackItem::Integer(value) => int_to_bytes(value),
            StackItem::ByteArray(bytes) => bytes.clone(),
            StackItem::Interop(interop) => interop.to_bytes(),
            StackItem::Array(_) | StackItem::Struct(_) | StackItem::Map(_) => Vec::new(),
        }
    }

    /// Array view: the elements of an array or struct, a singleton for
    /// scalars, empty for maps and interop handles.
    pub fn as_array(&self) -> Vec<StackItem> {
        match self {
            StackItem::Array(items) | StackItem::Struct(items) => items.borrow().clone(),
            StackItem::Map(_) | StackItem::Interop(_) => Vec::new(),
            scalar => vec![scalar.clone()],
        }
    }

    /// Map view: the entries of a map, empty for everything else.
    pub fn map_entries(&self) -> Vec<(StackItem, StackItem)> {
        match self {
            StackItem::Map(map) => map.borrow().iter().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn array_ref(&self) -> Option<&ArrayRef> {
        match self {
            StackItem::Array(items) | StackItem::Struct(items) => Some(items),
            _ => None,
        }
    }

    pub fn map_ref(&self) -> Option<&MapRef> {
        match self {
            StackItem::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_interop(&self) -> Option<&InteropInterface> {
        match self {
            StackItem::Interop(interop) => Some(interop),
            _ => None,
        }
    }

    pub fn is_compound(&self) -> bool {
        self.item_type().is_compound()
    }

    /// The copy a struct makes of itself when stored: nested structs are
    /// copied, every other element keeps its reference.
    pub fn clone_struct(&self) -> StackItem {
        match self {
            StackItem::Struct(items) => {
                let copied = items.borrow().iter().map(StackItem::clone_struct).collect();
                StackItem::new_struct(copied)
            }
            other => other.clone(),
        }
    }

    /// Value equality. Scalars compare by their byte form, interop handles
    /// by host-object identity, compounds structurally.
    pub fn equals(&self, other: &StackItem) -> bool {
        let mut visited = HashSet::new();
        self.equals_inner(other, &mut visited)
    }

    fn equals_inner(&self, other: &StackItem, visited: &mut HashSet<(usize, usize)>) -> bool {
        match (self, other) {
            (StackItem::Interop(a), StackItem::Interop(b)) => a.same_object(b),
            (StackItem::Interop(_), _) | (_, StackItem::Interop(_)) => false,
            (StackItem::Array(a), StackItem::Array(b))
            | (StackItem::Struct(a), StackItem::Struct(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let pair = (Rc::as_ptr(a) as usize, Rc::as_ptr(b) as usize);
                if !visited.insert(pair) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| x.equals_inner(y, visited))
            }
            (StackItem::Map(a), StackItem::Map(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let pair = (Rc::as_ptr(a) as usize, Rc::as_ptr(b) as usize);
                if !visited.insert(pair) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter().all(|(key, value)| match b.get(key) {
                        Some(other) => value.equals_inner(other, visited),
                        None => false,
                    })
            }
            (a, b) if a.is_compound() || b.is_compound() => false,
            (StackItem::Integer(a), StackItem::Integer(b)) => a == b,
            (StackItem::Boolean(a), StackItem::Boolean(b)) => a == b,
            (a, b) => a.as_bytes() == b.as_bytes(),
        }
    }
}

/// Decodes a signed little-endian integer; the empty array is zero.
pub fn bytes_to_int(bytes: &[u8]) -> BigInt {
    if bytes.is_empty() {
        BigInt::zero()
    } else {
        BigInt::from_signed_bytes_le(bytes)
    }
}

/// Encodes an integer as minimal signed little-endian; zero is empty.
pub fn int_to_bytes(value: &BigInt) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_signed_bytes_le()
    }
}

impl fmt::Debug for StackItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackItem::Boolean(value) => write!(f, "Boolean({value})"),
            StackItem::Integer(value) => write!(f, "Integer({value})"),
            StackItem::ByteArray(bytes) => write!(f, "ByteArray({bytes:02x?})"),
            StackItem::Array(items) => match items.try_borrow() {
                Ok(items) => write!(f, "Array(len={})", items.len()),
                Err(_) => f.write_str("Array(<borrowed>)"),
            },
            StackItem::Struct(items) => match items.try_borrow() {
                Ok(items) => write!(f, "Struct(len={})", items.len()),
                Err(_) => f.write_str("Struct(<borrowed>)"),
            },
            StackItem::Map(map) => match map.try_borrow() {
                Ok(map) => write!(f, "Map(len={})", map.len()),
                Err(_) => f.write_str("Map(<borrowed>)"),
            },
            StackItem::Interop(interop) => write!(f, "Interop({interop:?})"),
        }
    }
}

impl From<bool> for StackItem {
    fn from(value: bool) -> Self {
        StackItem::Boolean(value)
    }
}

impl From<BigInt> for StackItem {
    fn from(value: BigInt) -> Self {
        StackItem::Integer(value)
    }
}

impl From<i64> for StackItem {
    fn from(value: i64) -> Self {
        StackItem::Integer(BigInt::from(value))
    }
}

impl From<u32> for StackItem {
    fn from(value: u32) -> Self {
        StackItem::Integer(BigInt::from(value))
    }
}

impl From<Vec<u8>> for StackItem {
    fn from(value: Vec<u8>) -> Self {
        StackItem::ByteArray(value)
    }
}

impl From<&[u8]> for StackItem {
    fn from(value: &[u8]) -> Self {
        StackItem::ByteArray(value.to_vec())
    }
}

impl From<InteropInterface> for StackItem {
    fn from(value: InteropInterface) -> Self {
        StackItem::Interop(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_byte_encoding() {
        assert!(int_to_bytes(&BigInt::zero()).is_empty());
        assert_eq!(int_to_bytes(&BigInt::from(-1)), vec![0xFF]);
        assert_eq!(int_to_bytes(&BigInt::from(128)), vec![0x80, 0x00]);
        assert_eq!(bytes_to_int(&[0x80]), BigInt::from(-128));
        assert_eq!(bytes_to_int(&[]), BigInt::zero());
    }

    #[test]
    fn coercions_are_total() {
        let map = StackItem::new_map();
        assert!(!map.as_bool());
        assert!(map.as_bytes().is_empty());
        assert!(map.as_int().is_zero());
        assert!(map.as_array().is_empty());

        let array = StackItem::new_array(vec![]);
        assert!(array.as_bool());
        assert!(array.map_entries().is_empty());

        let scalar = StackItem::from_int(7);
        assert_eq!(scalar.as_array().len(), 1);
        assert!(StackItem::from_bytes(vec![0, 0, 1]).as_bool());
        assert!(!StackItem::from_bytes(vec![0, 0]).as_bool());
    }

    #[test]
    fn scalars_compare_by_bytes() {
        assert!(StackItem::from_int(1).equals(&StackItem::from_bool(true)));
        assert!(StackItem::from_int(5).equals(&StackItem::from_bytes(vec![5])));
        assert!(!StackItem::from_int(0).equals(&StackItem::from_bool(false)));
    }

    #[test]
    fn arrays_compare_deeply() {
        let a = StackItem::new_array(vec![StackItem::from_int(1), StackItem::from_bytes(b"x".to_vec())]);
        let b = StackItem::new_array(vec![StackItem::from_int(1), StackItem::from_bytes(b"x".to_vec())]);
        assert!(a.equals(&b));
        assert!(!a.equals(&StackItem::new_struct(vec![])));
    }

    #[test]
    fn cyclic_equality_terminates() {
        let a = StackItem::new_array(vec![]);
        let b = StackItem::new_array(vec![]);
        a.array_ref().unwrap().borrow_mut().push(a.clone());
        b.array_ref().unwrap().borrow_mut().push(b.clone());
        assert!(a.equals(&b));
        assert_eq!(format!("{a:?}"), "Array(len=1)");
    }

    #[test]
    fn struct_clone_copies_nested_structs() {
        let inner = StackItem::new_struct(vec![StackItem::from_int(1)]);
        let outer = StackItem::new_struct(vec![inner.clone()]);
        let copy = outer.clone_struct();
        inner.array_ref().unwrap().borrow_mut().push(StackItem::from_int(2));
        let copied_inner = copy.as_array()[0].clone();
        assert_eq!(copied_inner.as_array().len(), 1);
    }
}
