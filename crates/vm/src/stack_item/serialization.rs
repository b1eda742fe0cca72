//! Binary encoding of stack values for `Neo.Runtime.Serialize` and
//! `Neo.Runtime.Deserialize`.
//!
//! One type tag byte followed by the payload: a single byte for booleans,
//! 8-byte little-endian for integers, var-bytes for byte arrays, and a
//! var-int count followed by the elements (key then value for maps) for
//! compounds.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use sidechain_io::{BinaryWriter, MemoryReader};

use super::map::StackMap;
use super::stack_item::StackItem;
use super::stack_item_type::StackItemType;
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngineLimits;

/// Encodes `item`. Fails on interop handles, integers outside the i64 range,
/// cycles, and nesting deeper than `limits.max_serialize_depth`.
pub fn serialize(item: &StackItem, limits: &ExecutionEngineLimits) -> VmResult<Vec<u8>> {
    let mut writer = BinaryWriter::new();
    let mut path = Vec::new();
    write_item(item, &mut writer, &mut path, limits)?;
    if writer.len() > limits.max_item_size {
        return Err(VmError::ItemTooLarge {
            size: writer.len(),
            limit: limits.max_item_size,
        });
    }
    Ok(writer.into_bytes())
}

fn write_item(
    item: &StackItem,
    writer: &mut BinaryWriter,
    path: &mut Vec<usize>,
    limits: &ExecutionEngineLimits,
) -> VmResult<()> {
    match item {
        StackItem::ByteArray(bytes) => {
            writer.write_u8(StackItemType::ByteArray as u8);
            writer.write_var_bytes(bytes);
        }
        StackItem::Boolean(value) => {
            writer.write_u8(StackItemType::Boolean as u8);
            writer.write_bool(*value);
        }
        StackItem::Integer(value) => {
            let value = value.to_i64().ok_or_else(|| {
                VmError::serialization(format!("integer {value} does not fit in 64 bits"))
            })?;
            writer.write_u8(StackItemType::Integer as u8);
            writer.write_i64(value);
        }
        StackItem::Interop(interop) => {
            return Err(VmError::serialization(format!(
                "{} handles cannot be serialized",
                interop.kind()
            )));
        }
        StackItem::Array(items) | StackItem::Struct(items) => {
            let ptr = std::rc::Rc::as_ptr(items) as usize;
            enter(path, ptr, limits)?;
            writer.write_u8(item.item_type() as u8);
            let items = items.borrow();
            writer.write_var_int(items.len() as u64);
            for element in items.iter() {
                write_item(element, writer, path, limits)?;
            }
            path.pop();
        }
        StackItem::Map(map) => {
            let ptr = std::rc::Rc::as_ptr(map) as usize;
            enter(path, ptr, limits)?;
            writer.write_u8(StackItemType::Map as u8);
            let map = map.borrow();
            writer.write_var_int(map.len() as u64);
            for (key, value) in map.iter() {
                write_item(key, writer, path, limits)?;
                write_item(value, writer, path, limits)?;
            }
            path.pop();
        }
    }
    Ok(())
}

fn enter(path: &mut Vec<usize>, ptr: usize, limits: &ExecutionEngineLimits) -> VmResult<()> {
    if path.contains(&ptr) {
        return Err(VmError::serialization("cyclic value"));
    }
    if path.len() >= limits.max_serialize_depth {
        return Err(VmError::serialization(format!(
            "nesting deeper than {}",
            limits.max_serialize_depth
        )));
    }
    path.push(ptr);
    Ok(())
}

/// Decodes a value produced by [`serialize`]. Trailing bytes are rejected.
pub fn deserialize(data: &[u8], limits: &ExecutionEngineLimits) -> VmResult<StackItem> {
    let mut reader = MemoryReader::new(data);
    let item = read_item(&mut reader, 0, limits)?;
    if !reader.is_empty() {
        return Err(VmError::serialization(format!(
            "{} trailing bytes",
            reader.remaining()
        )));
    }
    Ok(item)
}

fn read_item(
    reader: &mut MemoryReader,
    depth: usize,
    limits: &ExecutionEngineLimits,
) -> VmResult<StackItem> {
    let tag = reader.read_u8()?;
    let item_type = StackItemType::from_byte(tag)
        .ok_or_else(|| VmError::serialization(format!("unknown type tag {tag:#04x}")))?;
    let item = match item_type {
        StackItemType::ByteArray => {
            StackItem::ByteArray(reader.read_var_bytes(limits.max_item_size)?)
        }
        StackItemType::Boolean => StackItem::Boolean(reader.read_bool()?),
        StackItemType::Integer => StackItem::Integer(BigInt::from(reader.read_i64()?)),
        StackItemType::InteropInterface => {
            return Err(VmError::serialization("interop handles cannot be deserialized"));
        }
        StackItemType::Array | StackItemType::Struct => {
            check_depth(depth, limits)?;
            let count = reader.read_var_int(limits.max_array_size as u64)? as usize;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(read_item(reader, depth + 1, limits)?);
            }
            if item_type == StackItemType::Struct {
                StackItem::new_struct(items)
            } else {
                StackItem::new_array(items)
            }
        }
        StackItemType::Map => {
            check_depth(depth, limits)?;
            let count = reader.read_var_int(limits.max_array_size as u64)? as usize;
            let mut map = StackMap::new();
            for _ in 0..count {
                let key = read_item(reader, depth + 1, limits)?;
                let value = read_item(reader, depth + 1, limits)?;
                if map.contains_key(&key) {
                    return Err(VmError::serialization("duplicate map key"));
                }
                map.insert(key, value);
            }
            StackItem::from_map(map)
        }
    };
    Ok(item)
}

fn check_depth(depth: usize, limits: &ExecutionEngineLimits) -> VmResult<()> {
    if depth >= limits.max_serialize_depth {
        return Err(VmError::serialization(format!(
            "nesting deeper than {}",
            limits.max_serialize_depth
        )));
    }
    Ok(())
}
