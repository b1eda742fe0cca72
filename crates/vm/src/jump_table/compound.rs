//! Array, struct and map instructions.
//!
//! Arrays and maps are shared by reference. A struct stored into another
//! compound is copied first, so the stored value no longer aliases the
//! original.

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::{check_array_size, pop_index, JumpTable};
use crate::op_code::OpCode;
use crate::stack_item::{StackItem, StackMap};

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::ARRAYSIZE, array_size);
    jump_table.register(OpCode::PACK, pack);
    jump_table.register(OpCode::UNPACK, unpack);
    jump_table.register(OpCode::PICKITEM, pick_item);
    jump_table.register(OpCode::SETITEM, set_item);
    jump_table.register(OpCode::NEWARRAY, new_array);
    jump_table.register(OpCode::NEWSTRUCT, new_array);
    jump_table.register(OpCode::NEWMAP, new_map);
    jump_table.register(OpCode::APPEND, append);
    jump_table.register(OpCode::REVERSE, reverse);
    jump_table.register(OpCode::REMOVE, remove);
    jump_table.register(OpCode::HASKEY, has_key);
    jump_table.register(OpCode::KEYS, keys);
    jump_table.register(OpCode::VALUES, values);
}

fn type_error(expected: &'static str, found: &StackItem) -> VmError {
    VmError::invalid_type(expected, found.type_name())
}

/// Array index from a key operand; negative or oversized keys fault.
fn element_index(key: &StackItem, len: usize) -> VmResult<usize> {
    let key = key.as_int();
    key.to_usize()
        .filter(|index| *index < len)
        .ok_or_else(|| {
            VmError::invalid_operation_msg(format!("index {key} out of range for length {len}"))
        })
}

fn check_map_key(key: &StackItem) -> VmResult<()> {
    if key.is_compound() {
        return Err(VmError::invalid_type("primitive map key", key.type_name()));
    }
    Ok(())
}

fn array_size(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let item = engine.pop()?;
    let size = match &item {
        StackItem::Array(items) | StackItem::Struct(items) => items.borrow().len(),
        StackItem::Map(map) => map.borrow().len(),
        other => other.as_bytes().len(),
    };
    engine.push(StackItem::Integer(BigInt::from(size)));
    Ok(())
}

/// Pops a count and that many items; the first item popped becomes
/// element zero.
fn pack(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let size = pop_index(engine)?;
    check_array_size(engine, size)?;
    let available = engine.evaluation_stack().len();
    if size > available {
        return Err(VmError::stack_underflow(size, available));
    }
    let mut items = Vec::with_capacity(size);
    for _ in 0..size {
        items.push(engine.pop()?);
    }
    engine.push(StackItem::new_array(items));
    Ok(())
}

fn unpack(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let item = engine.pop()?;
    let items = item
        .array_ref()
        .ok_or_else(|| type_error("Array", &item))?
        .borrow()
        .clone();
    let count = items.len();
    for element in items.into_iter().rev() {
        engine.push(element);
    }
    engine.push(StackItem::Integer(BigInt::from(count)));
    Ok(())
}

fn pick_item(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let key = engine.pop()?;
    let container = engine.pop()?;
    let value = match &container {
        StackItem::Array(items) | StackItem::Struct(items) => {
            let items = items.borrow();
            let index = element_index(&key, items.len())?;
            items[index].clone()
        }
        StackItem::Map(map) => {
            check_map_key(&key)?;
            map.borrow()
                .get(&key)
                .cloned()
                .ok_or_else(|| VmError::invalid_operation_msg("key not found in map"))?
        }
        other => return Err(type_error("Array or Map", other)),
    };
    engine.push(value);
    Ok(())
}

fn set_item(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let value = engine.pop()?.clone_struct();
    let key = engine.pop()?;
    let container = engine.pop()?;
    match &container {
        StackItem::Array(items) | StackItem::Struct(items) => {
            let mut items = items.borrow_mut();
            let index = element_index(&key, items.len())?;
            items[index] = value;
        }
        StackItem::Map(map) => {
            check_map_key(&key)?;
            let mut map = map.borrow_mut();
            if !map.contains_key(&key) {
                check_array_size(engine, map.len() + 1)?;
            }
            map.insert(key, value);
        }
        other => return Err(type_error("Array or Map", other)),
    }
    Ok(())
}

/// NEWARRAY and NEWSTRUCT take either a count, filling with `false`, or an
/// existing array or struct whose elements are re-wrapped.
fn new_array(engine: &mut ExecutionEngine, op: OpCode) -> VmResult<()> {
    let item = engine.pop()?;
    let items = match item.array_ref() {
        Some(items) => items.borrow().clone(),
        None => {
            let count = item.as_int();
            let count = count.to_usize().ok_or_else(|| {
                VmError::invalid_operation_msg(format!("invalid array size {count}"))
            })?;
            check_array_size(engine, count)?;
            vec![StackItem::Boolean(false); count]
        }
    };
    let array = if op == OpCode::NEWSTRUCT {
        StackItem::new_struct(items)
    } else {
        StackItem::new_array(items)
    };
    engine.push(array);
    Ok(())
}

fn new_map(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    engine.push(StackItem::from_map(StackMap::new()));
    Ok(())
}

fn append(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let item = engine.pop()?.clone_struct();
    let array = engine.pop()?;
    let items = array.array_ref().ok_or_else(|| type_error("Array", &array))?;
    let len = items.borrow().len();
    check_array_size(engine, len + 1)?;
    items.borrow_mut().push(item);
    Ok(())
}

fn reverse(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let array = engine.pop()?;
    let items = array.array_ref().ok_or_else(|| type_error("Array", &array))?;
    items.borrow_mut().reverse();
    Ok(())
}

fn remove(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let key = engine.pop()?;
    let container = engine.pop()?;
    match &container {
        StackItem::Array(items) | StackItem::Struct(items) => {
            let mut items = items.borrow_mut();
            let index = element_index(&key, items.len())?;
            items.remove(index);
        }
        StackItem::Map(map) => {
            check_map_key(&key)?;
            map.borrow_mut().remove(&key);
        }
        other => return Err(type_error("Array or Map", other)),
    }
    Ok(())
}

fn has_key(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let key = engine.pop()?;
    let container = engine.pop()?;
    let found = match &container {
        StackItem::Array(items) | StackItem::Struct(items) => {
            let index = key.as_int();
            let index = index.to_usize().ok_or_else(|| {
                VmError::invalid_operation_msg(format!("invalid index {index}"))
            })?;
            index < items.borrow().len()
        }
        StackItem::Map(map) => {
            check_map_key(&key)?;
            map.borrow().contains_key(&key)
        }
        other => return Err(type_error("Array or Map", other)),
    };
    engine.push(StackItem::Boolean(found));
    Ok(())
}

fn keys(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let map = engine.pop()?;
    let keys = map
        .map_ref()
        .ok_or_else(|| type_error("Map", &map))?
        .borrow()
        .keys();
    engine.push(StackItem::new_array(keys));
    Ok(())
}

fn values(engine: &mut ExecutionEngine, _op: OpCode) -> VmResult<()> {
    let container = engine.pop()?;
    let values = match &container {
        StackItem::Array(items) | StackItem::Struct(items) => items.borrow().clone(),
        StackItem::Map(map) => map.borrow().values(),
        other => return Err(type_error("Array or Map", other)),
    };
    let values = values.iter().map(StackItem::clone_struct).collect();
    engine.push(StackItem::new_array(values));
    Ok(())
}
